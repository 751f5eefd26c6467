//! Display strings for population, GDP and area figures.
//!
//! Every function here is pure: the same input always renders the same text, and
//! thousands are grouped with `,` regardless of the host locale.

use crate::model::{Area, AttributeKind, EntityKind, LocationEntity, UnitSystem};

const MILLION: f64 = 1e6;
const TRILLION: f64 = 1e12;

/// Bounded magnitude tiers, smallest first. Anything past them is shown in trillions.
const TIERS: [(f64, &str); 2] = [(MILLION, " million"), (1e9, " billion")];

/// Render `value` scaled to its magnitude.
///
/// Below one million the value is rounded to a whole number and grouped by thousands.
/// Above that it is divided into millions, billions or trillions and shown to three
/// significant digits. A value that rounds up to the next tier is shown in that tier,
/// so 999,999,999 renders as "1.00 billion".
#[must_use]
pub fn format_magnitude(value: f64) -> String {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };

    let whole = value.round();
    if whole < MILLION {
        return group_digits(&whole_digits(whole));
    }

    for (scale, suffix) in TIERS {
        if let Some(text) = three_significant(value / scale) {
            return format!("{text}{suffix}");
        }
    }

    let scaled = value / TRILLION;
    let text = three_significant(scaled)
        .unwrap_or_else(|| group_digits(&whole_digits(scaled.round())));
    format!("{text} trillion")
}

/// Render an attribute value given in the entity's recorded unit.
///
/// Area is shown in `units`: countries record square kilometers and US states square
/// miles, converting with the 2.589988 factor where they differ. GDP is prefixed with `$`.
#[must_use]
pub fn format_statistic(
    value: f64,
    attribute: AttributeKind,
    kind: EntityKind,
    units: UnitSystem,
) -> String {
    match attribute {
        AttributeKind::Population => format_magnitude(value),
        AttributeKind::Gdp => format!("${}", format_magnitude(value)),
        AttributeKind::Area => {
            let converted = Area::recorded(kind, value).in_units(units);
            format!("{} {}", format_magnitude(converted), units.area_suffix())
        }
    }
}

/// [`format_statistic`] for an entity's own value.
#[must_use]
pub fn format_entity_statistic(
    entity: &LocationEntity,
    attribute: AttributeKind,
    units: UnitSystem,
) -> String {
    format_statistic(
        entity.native_value(attribute),
        attribute,
        entity.kind(),
        units,
    )
}

/// Statistic with its attribute name in front, e.g. "GDP: $2.50 billion".
#[must_use]
pub fn format_labelled(
    entity: &LocationEntity,
    attribute: AttributeKind,
    units: UnitSystem,
) -> String {
    format!(
        "{}: {}",
        attribute.title(),
        format_entity_statistic(entity, attribute, units)
    )
}

/// How much larger `larger` is than `smaller`, in percent.
///
/// Returns `None` when `smaller` is zero, where no finite percentage exists.
#[must_use]
pub fn percent_difference(larger: f64, smaller: f64) -> Option<f64> {
    if smaller == 0.0 {
        return None;
    }
    let percent = (larger - smaller) / smaller * 100.0;
    percent.is_finite().then_some(percent)
}

/// Rounded percentage with grouped thousands, e.g. "1,305%".
#[must_use]
pub fn format_percent(percent: f64) -> String {
    let rounded = if percent.is_finite() {
        percent.max(0.0).round()
    } else {
        0.0
    };
    format!("{}%", group_digits(&whole_digits(rounded)))
}

/// Group the digits of `n` in threes with `,`.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Three significant digits for a value in `[1, 1000)`.
///
/// Halves round away from zero. Returns `None` when rounding reaches 1000.
fn three_significant(scaled: f64) -> Option<String> {
    let rounded = round_to(scaled, 3 - integer_digits(scaled));
    if rounded >= 1000.0 {
        return None;
    }
    // 9.996 rounds to 10.0, which has one digit fewer after the point
    let decimals = usize::try_from(3 - integer_digits(rounded)).unwrap_or(0);
    Some(format!("{rounded:.decimals$}"))
}

fn integer_digits(value: f64) -> i32 {
    if value >= 100.0 {
        3
    } else if value >= 10.0 {
        2
    } else {
        1
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Every digit of a whole, non-negative value, however large.
fn whole_digits(value: f64) -> String {
    format!("{:.0}", value.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_a_million_groups_thousands() {
        assert_eq!(format_magnitude(999_999.0), "999,999");
        assert_eq!(format_magnitude(36_469.0), "36,469");
        assert_eq!(format_magnitude(728.4), "728");
        assert_eq!(format_magnitude(0.0), "0");
    }

    #[test]
    fn millions_show_three_significant_digits() {
        assert_eq!(format_magnitude(1_234_567.0), "1.23 million");
        assert_eq!(format_magnitude(39_029_342.0), "39.0 million");
        assert_eq!(format_magnitude(333_287_557.0), "333 million");
    }

    #[test]
    fn billions_and_trillions() {
        assert_eq!(format_magnitude(2_500_000_000.0), "2.50 billion");
        assert_eq!(format_magnitude(1_412_175_000.0), "1.41 billion");
        assert_eq!(format_magnitude(25_462_700_000_000.0), "25.5 trillion");
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(format_magnitude(1_125_000.0), "1.13 million");
        assert_eq!(format_magnitude(999_999.5), "1.00 million");
    }

    #[test]
    fn rounding_promotes_to_the_next_tier() {
        assert_eq!(format_magnitude(999_999_999.0), "1.00 billion");
        assert_eq!(format_magnitude(9_996_000.0), "10.0 million");
        assert_eq!(format_magnitude(99_960_000.0), "100 million");
    }

    #[test]
    fn huge_values_stay_in_trillions() {
        assert_eq!(format_magnitude(1_234_500e12), "1,234,500 trillion");
        // 2^64 trillion, one past what a u64 holds
        assert_eq!(
            format_magnitude(1e12 * 18_446_744_073_709_551_616.0),
            "18,446,744,073,709,551,616 trillion"
        );
    }

    #[test]
    fn huge_percentages_keep_every_digit() {
        assert_eq!(
            format_percent(2_f64.powi(70)),
            "1,180,591,620,717,411,303,424%"
        );
    }

    #[test]
    fn population_has_no_prefix() {
        let text = format_statistic(
            1_234_567.0,
            AttributeKind::Population,
            EntityKind::Country,
            UnitSystem::Imperial,
        );
        assert_eq!(text, "1.23 million");
    }

    #[test]
    fn gdp_has_dollar_prefix() {
        let text = format_statistic(
            2_500_000_000.0,
            AttributeKind::Gdp,
            EntityKind::UsState,
            UnitSystem::Imperial,
        );
        assert_eq!(text, "$2.50 billion");
    }

    #[test]
    fn country_area_converts_to_square_miles() {
        let text = format_statistic(
            10_000_000.0,
            AttributeKind::Area,
            EntityKind::Country,
            UnitSystem::Imperial,
        );
        assert_eq!(text, "3.86 million square miles");
    }

    #[test]
    fn state_area_is_already_square_miles() {
        let text = format_statistic(
            268_596.0,
            AttributeKind::Area,
            EntityKind::UsState,
            UnitSystem::Imperial,
        );
        assert_eq!(text, "268,596 square miles");
    }

    #[test]
    fn metric_units_convert_state_area() {
        let state = format_statistic(
            1_000.0,
            AttributeKind::Area,
            EntityKind::UsState,
            UnitSystem::Metric,
        );
        assert_eq!(state, "2,590 square kilometers");

        let country = format_statistic(
            756_102.0,
            AttributeKind::Area,
            EntityKind::Country,
            UnitSystem::Metric,
        );
        assert_eq!(country, "756,102 square kilometers");
    }

    #[test]
    fn percent_difference_rounds_to_whole_percent() {
        let percent = percent_difference(220.0, 216.0).unwrap();
        assert!((percent - 1.851_851).abs() < 1e-5);
        assert_eq!(format_percent(percent), "2%");
        assert_eq!(format_percent(1_305.4), "1,305%");
    }

    #[test]
    fn zero_smaller_value_is_not_comparable() {
        assert_eq!(percent_difference(10.0, 0.0), None);
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(3_861_021), "3,861,021");
    }
}
