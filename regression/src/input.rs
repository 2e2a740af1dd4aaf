use crate::{Features, InputError};

/// One of the three manually entered predictors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Hp,
    Wt,
    Disp,
}

impl InputField {
    /// Fields in form order.
    pub const ALL: [InputField; 3] = [InputField::Hp, InputField::Wt, InputField::Disp];

    /// Column name used in CSV files.
    pub fn column(self) -> &'static str {
        match self {
            InputField::Hp => "hp",
            InputField::Wt => "wt",
            InputField::Disp => "disp",
        }
    }

    /// Human-readable label shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            InputField::Hp => "Horsepower (hp)",
            InputField::Wt => "Weight (wt in 1000 lbs)",
            InputField::Disp => "Displacement (disp in cubic inches)",
        }
    }

    /// Decimal places kept when stepping and displaying.
    pub fn decimals(self) -> usize {
        match self {
            InputField::Hp => 0,
            InputField::Wt | InputField::Disp => 2,
        }
    }

    /// Whether the field only accepts whole numbers.
    pub fn is_integer(self) -> bool {
        self.decimals() == 0
    }

    /// Parses a field from its column name.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

/// Range, default and step of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    min: f64,
    max: f64,
    default: f64,
    step: f64,
}

impl FieldBounds {
    /// Validates and creates bounds for `field`.
    ///
    /// # Errors
    /// Returns `InputError::InvalidBounds` if a value is not finite, the range
    /// is empty, the default lies outside it, the step is not positive, or an
    /// integer field gets fractional bounds.
    pub fn new(
        field: InputField,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Result<Self, InputError> {
        let invalid = |reason| InputError::InvalidBounds { field, reason };

        if ![min, max, default, step].iter().all(|v| v.is_finite()) {
            return Err(invalid("values must be finite"));
        }
        if min >= max {
            return Err(invalid("min must be below max"));
        }
        if default < min || default > max {
            return Err(invalid("default must lie within [min, max]"));
        }
        if step <= 0.0 {
            return Err(invalid("step must be positive"));
        }
        if field.is_integer() && [min, max, default, step].iter().any(|v| v.fract() != 0.0) {
            return Err(invalid("values must be whole numbers"));
        }

        Ok(Self {
            min,
            max,
            default,
            step,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Bounds for all three fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputBounds {
    pub hp: FieldBounds,
    pub wt: FieldBounds,
    pub disp: FieldBounds,
}

impl InputBounds {
    pub fn get(&self, field: InputField) -> &FieldBounds {
        match field {
            InputField::Hp => &self.hp,
            InputField::Wt => &self.wt,
            InputField::Disp => &self.disp,
        }
    }

    /// The bounds' defaults as a feature row.
    pub fn defaults(&self) -> Features {
        Features::new(
            self.hp.default_value(),
            self.wt.default_value(),
            self.disp.default_value(),
        )
    }
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            hp: FieldBounds {
                min: 50.0,
                max: 400.0,
                default: 110.0,
                step: 1.0,
            },
            wt: FieldBounds {
                min: 1.0,
                max: 6.0,
                default: 3.0,
                step: 0.01,
            },
            disp: FieldBounds {
                min: 50.0,
                max: 500.0,
                default: 200.0,
                step: 0.01,
            },
        }
    }
}

/// Current values of the manual prediction form.
///
/// Every stored value lies within its field's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualInput {
    bounds: InputBounds,
    values: Features,
}

impl ManualInput {
    /// Creates the form with every field at its default.
    pub fn new(bounds: InputBounds) -> Self {
        Self {
            values: bounds.defaults(),
            bounds,
        }
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    pub fn value(&self, field: InputField) -> f64 {
        match field {
            InputField::Hp => self.values.hp,
            InputField::Wt => self.values.wt,
            InputField::Disp => self.values.disp,
        }
    }

    /// The field's value formatted with its decimal places.
    pub fn display_value(&self, field: InputField) -> String {
        format!("{:.*}", field.decimals(), self.value(field))
    }

    /// Sets a field, keeping the previous value on error.
    ///
    /// The value is rounded to the field's decimal places, so the stored value
    /// always matches [`ManualInput::display_value`].
    ///
    /// # Errors
    /// Returns `InputError::NotAnInteger` for a fractional horsepower and
    /// `InputError::OutOfRange` outside the field's bounds.
    pub fn set(&mut self, field: InputField, value: f64) -> Result<(), InputError> {
        let bounds = self.bounds.get(field);

        if field.is_integer() && value.fract() != 0.0 {
            return Err(InputError::NotAnInteger { field, value });
        }
        let value = round_to(value, field.decimals());
        if !bounds.contains(value) {
            return Err(InputError::OutOfRange {
                field,
                value,
                min: bounds.min(),
                max: bounds.max(),
            });
        }

        *self.slot(field) = value;
        Ok(())
    }

    /// Parses `text` and sets the field.
    ///
    /// # Errors
    /// Returns `InputError::NotANumber` if `text` is not a finite number, or
    /// any error of [`ManualInput::set`].
    pub fn parse_and_set(&mut self, field: InputField, text: &str) -> Result<(), InputError> {
        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::NotANumber {
                field,
                text: text.to_string(),
            })?;

        self.set(field, value)
    }

    /// Moves a field by `steps` steps, clamped to its bounds.
    pub fn increment(&mut self, field: InputField, steps: i32) {
        let bounds = *self.bounds.get(field);
        let moved = self.value(field) + bounds.step() * f64::from(steps);

        *self.slot(field) = bounds.clamp(round_to(moved, field.decimals()));
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        self.values = self.bounds.defaults();
    }

    /// The form as a feature row for prediction.
    pub fn features(&self) -> Features {
        self.values
    }

    fn slot(&mut self, field: InputField) -> &mut f64 {
        match field {
            InputField::Hp => &mut self.values.hp,
            InputField::Wt => &mut self.values.wt,
            InputField::Disp => &mut self.values.disp,
        }
    }
}

impl Default for ManualInput {
    fn default() -> Self {
        Self::new(InputBounds::default())
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Formats a prediction rounded to two decimal places.
pub fn format_prediction(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_defaults() {
        let input = ManualInput::default();
        assert_eq!(input.features(), Features::new(110.0, 3.0, 200.0));
        assert_eq!(input.display_value(InputField::Hp), "110");
        assert_eq!(input.display_value(InputField::Wt), "3.00");
    }

    #[test]
    fn rejects_out_of_range_and_keeps_previous_value() {
        let mut input = ManualInput::default();

        let err = input.set(InputField::Wt, 6.5).unwrap_err();

        assert_eq!(
            err,
            InputError::OutOfRange {
                field: InputField::Wt,
                value: 6.5,
                min: 1.0,
                max: 6.0,
            }
        );
        assert_eq!(input.value(InputField::Wt), 3.0);
    }

    #[test]
    fn range_is_inclusive() {
        let mut input = ManualInput::default();
        input.set(InputField::Hp, 50.0).unwrap();
        input.set(InputField::Disp, 500.0).unwrap();
        assert_eq!(input.features(), Features::new(50.0, 3.0, 500.0));
    }

    #[test]
    fn horsepower_must_be_whole() {
        let mut input = ManualInput::default();
        assert!(matches!(
            input.parse_and_set(InputField::Hp, "120.5"),
            Err(InputError::NotAnInteger { .. })
        ));
        input.parse_and_set(InputField::Hp, " 120 ").unwrap();
        assert_eq!(input.value(InputField::Hp), 120.0);
    }

    #[test]
    fn garbage_text_is_not_a_number() {
        let mut input = ManualInput::default();
        assert!(matches!(
            input.parse_and_set(InputField::Disp, "big"),
            Err(InputError::NotANumber { .. })
        ));
        assert!(input.parse_and_set(InputField::Disp, "inf").is_err());
    }

    #[test]
    fn increment_rounds_and_clamps() {
        let mut input = ManualInput::default();

        input.increment(InputField::Wt, 3);
        assert_eq!(input.value(InputField::Wt), 3.03);

        input.increment(InputField::Hp, 1000);
        assert_eq!(input.value(InputField::Hp), 400.0);

        input.increment(InputField::Disp, -100_000);
        assert_eq!(input.value(InputField::Disp), 50.0);
    }

    #[test]
    fn set_rounds_to_field_precision() {
        let mut input = ManualInput::default();

        input.parse_and_set(InputField::Wt, "3.456789").unwrap();
        assert_eq!(input.value(InputField::Wt), 3.46);
        assert_eq!(input.display_value(InputField::Wt), "3.46");

        input.set(InputField::Disp, 6.004 * 50.0).unwrap();
        assert_eq!(input.value(InputField::Disp), 300.2);

        assert!(input.parse_and_set(InputField::Wt, "6.004").is_ok());
        assert_eq!(input.value(InputField::Wt), 6.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut input = ManualInput::default();
        input.set(InputField::Hp, 300.0).unwrap();
        input.reset();
        assert_eq!(input.value(InputField::Hp), 110.0);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(FieldBounds::new(InputField::Wt, 6.0, 1.0, 3.0, 0.01).is_err());
        assert!(FieldBounds::new(InputField::Wt, 1.0, 6.0, 7.0, 0.01).is_err());
        assert!(FieldBounds::new(InputField::Wt, 1.0, 6.0, 3.0, 0.0).is_err());
        assert!(FieldBounds::new(InputField::Hp, 50.0, 400.0, 110.5, 1.0).is_err());
        assert!(FieldBounds::new(InputField::Hp, 50.0, 400.0, 110.0, 1.0).is_ok());
    }

    #[test]
    fn prediction_is_rounded_to_two_places() {
        assert_eq!(format_prediction(22.088211), "22.09");
        assert_eq!(format_prediction(10.0), "10.00");
    }
}
