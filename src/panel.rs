//! Display model of the calculator screen.
//!
//! Holds what the fields and sliders show and turns user input events into
//! new screen states. Events are plain data, so the model is driven by
//! `use_reducer` in the UI and by ordinary function calls in tests.

use std::rc::Rc;

use yew::Reducible;

use crate::locale::NumberLocale;
use crate::{format_quantity, CuttingState, Quantity};

/// User input on the calculator screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The text of a field changed
    FieldEdited(Quantity, String),
    /// A slider was dragged to a new position
    SliderDragged(Quantity, i32),
}

/// Text content of the three input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTexts {
    pub diameter: String,
    pub rpm: String,
    pub cut_speed: String,
}

impl FieldTexts {
    fn formatted(locale: &NumberLocale, state: &CuttingState) -> Self {
        let text = |q: Quantity| format_quantity(locale, q, state.readings.get(q));
        Self {
            diameter: text(Quantity::Diameter),
            rpm: text(Quantity::Rpm),
            cut_speed: text(Quantity::CutSpeed),
        }
    }

    pub fn get(&self, quantity: Quantity) -> &str {
        match quantity {
            Quantity::Diameter => &self.diameter,
            Quantity::Rpm => &self.rpm,
            Quantity::CutSpeed => &self.cut_speed,
        }
    }

    fn set(&mut self, quantity: Quantity, text: String) {
        match quantity {
            Quantity::Diameter => self.diameter = text,
            Quantity::Rpm => self.rpm = text,
            Quantity::CutSpeed => self.cut_speed = text,
        }
    }
}

/// Slider position mirroring `value`: truncated toward zero and clamped to
/// `0..=max`. NaN maps to 0.
pub fn slider_progress(value: f64, max: i32) -> i32 {
    (value as i32).clamp(0, max.max(0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub state: CuttingState,
    pub texts: FieldTexts,
    pub locale: NumberLocale,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(NumberLocale::default())
    }
}

impl Panel {
    pub fn new(locale: NumberLocale) -> Self {
        let state = CuttingState::default();
        Self {
            texts: FieldTexts::formatted(&locale, &state),
            state,
            locale,
        }
    }

    pub fn text(&self, quantity: Quantity) -> &str {
        self.texts.get(quantity)
    }

    pub fn value(&self, quantity: Quantity) -> f64 {
        self.state.readings.get(quantity)
    }

    pub fn slider_progress(&self, quantity: Quantity, max: i32) -> i32 {
        slider_progress(self.value(quantity), max)
    }

    /// Apply one input event and return the next screen state.
    ///
    /// The edited field keeps its text exactly as typed; only the recomputed
    /// field is rewritten.
    pub fn apply(&self, event: PanelEvent) -> Panel {
        let (edited, raw_text) = match event {
            PanelEvent::FieldEdited(quantity, text) => (quantity, text),
            PanelEvent::SliderDragged(quantity, progress) => (
                quantity,
                format_quantity(&self.locale, quantity, f64::from(progress)),
            ),
        };

        let result = self.state.edit_text(edited, &raw_text);

        let mut texts = self.texts.clone();
        texts.set(edited, raw_text);
        if let Some(recomputed) = result.recomputed {
            let value = result.state.readings.get(recomputed);
            texts.set(recomputed, format_quantity(&self.locale, recomputed, value));
        }

        Panel {
            state: result.state,
            texts,
            locale: self.locale,
        }
    }
}

impl Reducible for Panel {
    type Action = PanelEvent;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_texts_are_formatted() {
        let panel = Panel::default();
        assert_eq!(panel.text(Quantity::Diameter), "20.0");
        assert_eq!(panel.text(Quantity::Rpm), "1592");
        assert_eq!(panel.text(Quantity::CutSpeed), "100");

        let panel = Panel::new(NumberLocale::DECIMAL_COMMA);
        assert_eq!(panel.text(Quantity::Diameter), "20,0");
    }

    #[test]
    fn edited_field_keeps_raw_text() {
        let panel = Panel::default().apply(PanelEvent::FieldEdited(Quantity::Diameter, "25".into()));
        assert_eq!(panel.text(Quantity::Diameter), "25");
        assert_eq!(panel.text(Quantity::Rpm), "1273");
        assert_eq!(panel.text(Quantity::CutSpeed), "100");
    }

    #[test]
    fn partial_input_is_not_reformatted() {
        let panel = Panel::new(NumberLocale::DECIMAL_COMMA)
            .apply(PanelEvent::FieldEdited(Quantity::Diameter, "12,".into()));
        assert_eq!(panel.text(Quantity::Diameter), "12,");
        assert_eq!(panel.value(Quantity::Diameter), 12.0);
    }

    #[test]
    fn second_edit_preserves_first() {
        let panel = Panel::default()
            .apply(PanelEvent::FieldEdited(Quantity::Rpm, "1000".into()))
            .apply(PanelEvent::FieldEdited(Quantity::CutSpeed, "200".into()));
        assert_eq!(panel.text(Quantity::Rpm), "1000");
        assert_eq!(panel.text(Quantity::CutSpeed), "200");
        assert_eq!(panel.text(Quantity::Diameter), "63.7");
    }

    #[test]
    fn slider_drag_writes_field_and_propagates() {
        let panel = Panel::default().apply(PanelEvent::SliderDragged(Quantity::Rpm, 500));
        assert_eq!(panel.text(Quantity::Rpm), "500");
        assert_eq!(panel.value(Quantity::Rpm), 500.0);
        // first edit of rpm anchors on diameter, so cut speed follows
        assert_eq!(panel.text(Quantity::CutSpeed), "31");
        assert_eq!(panel.text(Quantity::Diameter), "20.0");
        assert_eq!(panel.state.history.source, Some(Quantity::Rpm));
    }

    #[test]
    fn cut_speed_slider_drag_recomputes_rpm() {
        let panel = Panel::default().apply(PanelEvent::SliderDragged(Quantity::CutSpeed, 150));
        assert_eq!(panel.text(Quantity::CutSpeed), "150");
        assert_eq!(panel.value(Quantity::CutSpeed), 150.0);
        // first edit of cut speed anchors on diameter, so rpm follows
        assert_eq!(panel.text(Quantity::Rpm), "2387");
        assert_eq!(panel.text(Quantity::Diameter), "20.0");
        assert_eq!(panel.state.history.previous, Some(Quantity::Diameter));
        assert_eq!(panel.slider_progress(Quantity::Rpm, 10_000), 2387);
    }

    #[test]
    fn sliders_mirror_truncated_values() {
        let panel = Panel::default();
        assert_eq!(panel.slider_progress(Quantity::Rpm, 10_000), 1591);
        assert_eq!(panel.slider_progress(Quantity::CutSpeed, 1_000), 100);
        assert_eq!(panel.slider_progress(Quantity::Rpm, 1_000), 1_000);
    }

    #[test]
    fn slider_progress_handles_non_finite_values() {
        assert_eq!(slider_progress(f64::NAN, 100), 0);
        assert_eq!(slider_progress(f64::INFINITY, 100), 100);
        assert_eq!(slider_progress(-3.0, 100), 0);
    }

    #[test]
    fn empty_field_shows_infinite_dependent() {
        let panel = Panel::default().apply(PanelEvent::FieldEdited(Quantity::Diameter, String::new()));
        assert_eq!(panel.text(Quantity::Diameter), "");
        assert_eq!(panel.text(Quantity::Rpm), "Infinity");
    }

    #[test]
    fn reducer_applies_events() {
        let panel = Rc::new(Panel::default());
        let next = panel.reduce(PanelEvent::FieldEdited(Quantity::CutSpeed, "150".into()));
        assert_eq!(next.text(Quantity::Rpm), "2387");
    }
}
