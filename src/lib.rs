use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

pub mod locale;
pub mod panel;

use locale::NumberLocale;

/// Default state of the calculator when the screen opens
pub mod defaults {
    pub const DIAMETER_MM: f64 = 20.0;
    pub const CUT_SPEED_M_PER_MIN: f64 = 100.0;
}

/// One of the three related machining parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Workpiece or tool diameter in millimeters
    Diameter,
    /// Rotational speed in revolutions per minute
    Rpm,
    /// Peripheral cutting speed in meters per minute
    CutSpeed,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Diameter, Quantity::Rpm, Quantity::CutSpeed];

    /// Number of decimal places shown in the quantity's field.
    pub fn decimals(self) -> usize {
        match self {
            Quantity::Diameter => 1,
            Quantity::Rpm | Quantity::CutSpeed => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quantity::Diameter => "Diameter",
            Quantity::Rpm => "Speed",
            Quantity::CutSpeed => "Cutting speed",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Diameter => "mm",
            Quantity::Rpm => "rpm",
            Quantity::CutSpeed => "m/min",
        }
    }

    /// Previous source assumed when the very first edit happens.
    fn default_anchor(self) -> Quantity {
        match self {
            Quantity::Diameter => Quantity::CutSpeed,
            Quantity::Rpm | Quantity::CutSpeed => Quantity::Diameter,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Diameter => write!(f, "diameter"),
            Quantity::Rpm => write!(f, "rpm"),
            Quantity::CutSpeed => write!(f, "cut_speed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuantityError(pub String);

impl fmt::Display for ParseQuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown quantity {:?} (expected diameter, rpm or cut_speed)",
            self.0
        )
    }
}

impl std::error::Error for ParseQuantityError {}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diameter" => Ok(Quantity::Diameter),
            "rpm" => Ok(Quantity::Rpm),
            "cut_speed" | "cutspeed" => Ok(Quantity::CutSpeed),
            _ => Err(ParseQuantityError(s.to_string())),
        }
    }
}

#[inline]
pub fn cut_speed_from_rpm_and_diameter(rpm: f64, diameter: f64) -> f64 {
    PI * diameter * rpm / 1000.0
}

#[inline]
pub fn rpm_from_cut_speed_and_diameter(cut_speed: f64, diameter: f64) -> f64 {
    1000.0 * cut_speed / (PI * diameter)
}

#[inline]
pub fn diameter_from_cut_speed_and_rpm(cut_speed: f64, rpm: f64) -> f64 {
    1000.0 * cut_speed / (rpm * PI)
}

/// Current values of the three quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub diameter: f64,
    pub rpm: f64,
    pub cut_speed: f64,
}

impl Default for Readings {
    fn default() -> Self {
        let diameter = defaults::DIAMETER_MM;
        let cut_speed = defaults::CUT_SPEED_M_PER_MIN;
        Self {
            diameter,
            rpm: rpm_from_cut_speed_and_diameter(cut_speed, diameter),
            cut_speed,
        }
    }
}

impl Readings {
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Diameter => self.diameter,
            Quantity::Rpm => self.rpm,
            Quantity::CutSpeed => self.cut_speed,
        }
    }

    pub fn set(&mut self, quantity: Quantity, value: f64) {
        match quantity {
            Quantity::Diameter => self.diameter = value,
            Quantity::Rpm => self.rpm = value,
            Quantity::CutSpeed => self.cut_speed = value,
        }
    }

    /// Recompute `target` from the other two readings.
    fn derive(&mut self, target: Quantity) {
        let value = match target {
            Quantity::Diameter => diameter_from_cut_speed_and_rpm(self.cut_speed, self.rpm),
            Quantity::Rpm => rpm_from_cut_speed_and_diameter(self.cut_speed, self.diameter),
            Quantity::CutSpeed => cut_speed_from_rpm_and_diameter(self.rpm, self.diameter),
        };
        self.set(target, value);
    }
}

/// The last two distinct quantities the user edited.
///
/// `source` is the field currently being edited and `previous` the distinct
/// field edited before it. Both are `None` until the first edit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHistory {
    pub source: Option<Quantity>,
    pub previous: Option<Quantity>,
}

impl EditHistory {
    /// Record an edit of `edited` and return the resulting history.
    pub fn record(self, edited: Quantity) -> Self {
        let mut next = self;
        if next.source != Some(edited) {
            next.previous = next.source;
            next.source = Some(edited);
        }
        if next.previous.is_none() {
            next.previous = Some(edited.default_anchor());
        }
        next
    }
}

/// Result of applying one edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    pub state: CuttingState,
    /// The quantity whose value was overwritten, if any
    pub recomputed: Option<Quantity>,
}

/// Values plus edit history; the whole model behind the calculator screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuttingState {
    pub readings: Readings,
    pub history: EditHistory,
}

impl CuttingState {
    /// Apply a new value for `edited` and recompute the one quantity that is
    /// neither the edited one nor the previously edited one. The value edited
    /// two steps ago is never overwritten.
    pub fn propagate(&self, edited: Quantity, value: f64) -> Propagation {
        let history = self.history.record(edited);
        let mut readings = self.readings;
        readings.set(edited, value);

        let recomputed = match (edited, history.previous) {
            (Quantity::Diameter, Some(Quantity::Rpm)) | (Quantity::Rpm, Some(Quantity::Diameter)) => {
                Some(Quantity::CutSpeed)
            }
            (Quantity::Diameter, Some(Quantity::CutSpeed))
            | (Quantity::CutSpeed, Some(Quantity::Diameter)) => Some(Quantity::Rpm),
            (Quantity::Rpm, Some(Quantity::CutSpeed)) | (Quantity::CutSpeed, Some(Quantity::Rpm)) => {
                Some(Quantity::Diameter)
            }
            _ => None,
        };

        if let Some(target) = recomputed {
            readings.derive(target);
        }

        debug!(
            "Source {}, value = {}, previous source {:?}, recomputed {:?}",
            edited, value, history.previous, recomputed
        );

        Propagation {
            state: CuttingState { readings, history },
            recomputed,
        }
    }

    /// Parse the raw text of a field and propagate it. Unparseable text
    /// counts as zero.
    pub fn edit_text(&self, edited: Quantity, raw_text: &str) -> Propagation {
        self.propagate(edited, locale::parse_or_zero(raw_text))
    }

    /// Whether the readings satisfy `cut_speed = π·d·n/1000` within `tolerance`.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let Readings {
            diameter,
            rpm,
            cut_speed,
        } = self.readings;
        (cut_speed_from_rpm_and_diameter(rpm, diameter) - cut_speed).abs() <= tolerance
    }
}

/// Why a JS edit request could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EditRequestError {
    State(String),
    Quantity(ParseQuantityError),
}

impl fmt::Display for EditRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRequestError::State(e) => write!(f, "Failed to deserialize state: {}", e),
            EditRequestError::Quantity(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EditRequestError {}

impl From<ParseQuantityError> for EditRequestError {
    fn from(e: ParseQuantityError) -> Self {
        EditRequestError::Quantity(e)
    }
}

/// Apply one edit request coming from JavaScript.
///
/// `state` is `None` when the caller passed no state, in which case the
/// default state is edited.
pub fn apply_edit<E: fmt::Display>(
    state: Option<Result<CuttingState, E>>,
    quantity: &str,
    raw_text: &str,
) -> Result<CuttingState, EditRequestError> {
    let state = match state {
        None => CuttingState::default(),
        Some(decoded) => decoded.map_err(|e| EditRequestError::State(e.to_string()))?,
    };
    let quantity = quantity.parse::<Quantity>()?;

    let result = state.edit_text(quantity, raw_text);
    info!(
        "Edited {} from JS, recomputed {:?}",
        quantity, result.recomputed
    );
    Ok(result.state)
}

/// JavaScript entry point applying one field edit to a serialized state.
///
/// # Arguments
/// * `state_js` - Serialized `CuttingState`, or `undefined`/`null` for the default state
/// * `quantity` - One of `diameter`, `rpm`, `cut_speed`
/// * `raw_text` - Field text as typed, comma or period decimal separator
///
/// # Returns
/// The serialized new state, or a string describing the error
#[wasm_bindgen]
pub fn propagate_edit(state_js: JsValue, quantity: &str, raw_text: &str) -> JsValue {
    let state = if state_js.is_undefined() || state_js.is_null() {
        None
    } else {
        Some(serde_wasm_bindgen::from_value::<CuttingState>(state_js))
    };

    match apply_edit(state, quantity, raw_text) {
        Ok(next) => serde_wasm_bindgen::to_value(&next).unwrap_or(JsValue::NULL),
        Err(e) => serde_wasm_bindgen::to_value(&e.to_string()).unwrap_or(JsValue::NULL),
    }
}

/// Format a value of `quantity` with its display precision.
pub fn format_quantity(locale: &NumberLocale, quantity: Quantity, value: f64) -> String {
    locale.format(value, quantity.decimals())
}
