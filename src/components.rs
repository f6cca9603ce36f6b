//! Pure Yew view components for the calculator screen.
//!
//! Components render from props only; the panel model decides every value.

use cutting_speed::Quantity;
use yew::prelude::*;

/// Numeric text field for one quantity.
#[derive(Properties, PartialEq)]
pub struct QuantityInputProps {
    pub quantity: Quantity,
    pub text: AttrValue,
    pub oninput: Callback<InputEvent>,
}

#[function_component(QuantityInput)]
pub fn quantity_input(props: &QuantityInputProps) -> Html {
    let id = format!("{}_input", props.quantity);

    html! {
        <div class="form-group">
            <label for={id.clone()}>{ format!("{}:", props.quantity.label()) }</label>
            <div class="input-with-unit">
                // Text rather than number input so a decimal comma is accepted
                <input
                    type="text"
                    inputmode="decimal"
                    id={id}
                    value={props.text.clone()}
                    oninput={props.oninput.clone()}
                />
                <span class="unit">{ props.quantity.unit() }</span>
            </div>
        </div>
    }
}

/// Range slider mirroring a quantity as an integer position.
#[derive(Properties, PartialEq)]
pub struct QuantitySliderProps {
    pub quantity: Quantity,
    pub progress: i32,
    pub max: i32,
    pub oninput: Callback<InputEvent>,
}

#[function_component(QuantitySlider)]
pub fn quantity_slider(props: &QuantitySliderProps) -> Html {
    html! {
        <div class="slider-row">
            <input type="range"
                min="0"
                max={props.max.to_string()}
                step="1"
                aria-label={props.quantity.label()}
                value={props.progress.to_string()}
                oninput={props.oninput.clone()}
            />
            <span class="slider-range">{ format!("0 - {} {}", props.max, props.quantity.unit()) }</span>
        </div>
    }
}
