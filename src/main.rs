//! Main module for the Cutting Speed calculator using Yew.
//! Wires the panel model to the input fields and sliders.

use cutting_speed::{
    locale::NumberLocale,
    panel::{Panel, PanelEvent},
    Quantity,
};
use log::{debug, info};
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;

use components::{QuantityInput, QuantitySlider};
use config::*;

/// The single calculator screen.
#[function_component(Main)]
fn main_component() -> Html {
    let panel = use_reducer(|| Panel::new(NumberLocale::detect()));

    // --- OnInput Handlers ---
    let field_oninput = |quantity: Quantity| {
        let panel = panel.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            panel.dispatch(PanelEvent::FieldEdited(quantity, input.value()));
        })
    };
    let slider_oninput = |quantity: Quantity| {
        let panel = panel.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.value().parse::<i32>() {
                Ok(progress) => panel.dispatch(PanelEvent::SliderDragged(quantity, progress)),
                Err(_) => debug!("Ignoring slider value {:?}", input.value()),
            }
        })
    };

    html! {
        <div class="container">
            <h1>{ APP_TITLE }</h1>

            <QuantityInput
                quantity={Quantity::Diameter}
                text={panel.text(Quantity::Diameter).to_string()}
                oninput={field_oninput(Quantity::Diameter)}
            />

            <QuantityInput
                quantity={Quantity::Rpm}
                text={panel.text(Quantity::Rpm).to_string()}
                oninput={field_oninput(Quantity::Rpm)}
            />
            <QuantitySlider
                quantity={Quantity::Rpm}
                progress={panel.slider_progress(Quantity::Rpm, RPM_SLIDER_MAX)}
                max={RPM_SLIDER_MAX}
                oninput={slider_oninput(Quantity::Rpm)}
            />

            <QuantityInput
                quantity={Quantity::CutSpeed}
                text={panel.text(Quantity::CutSpeed).to_string()}
                oninput={field_oninput(Quantity::CutSpeed)}
            />
            <QuantitySlider
                quantity={Quantity::CutSpeed}
                progress={panel.slider_progress(Quantity::CutSpeed, CUT_SPEED_SLIDER_MAX)}
                max={CUT_SPEED_SLIDER_MAX}
                oninput={slider_oninput(Quantity::CutSpeed)}
            />

            <p class="formula">{ "v = π · d · n / 1000" }</p>
        </div>
    }
}

/// Entry point: installs panic and log hooks, then renders the screen.
fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(level);
    info!("Starting {}", APP_TITLE);
    yew::Renderer::<Main>::new().render();
}
