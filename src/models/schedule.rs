//! Weekday-keyed amounts and work schedules.
//!
//! This module defines [`WeekdayAmounts`], a per-weekday table of monetary
//! values, and [`WorkSchedule`], the set of weekdays an employee is
//! regularly scheduled to work.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All weekdays in calendar order starting from Monday.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns the short lowercase key for a weekday (`"mon"` .. `"sun"`).
///
/// # Example
///
/// ```
/// use payroll_engine::models::weekday_key;
/// use chrono::Weekday;
///
/// assert_eq!(weekday_key(Weekday::Thu), "thu");
/// ```
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Returns the full English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a weekday from a short or full name, case-insensitively.
///
/// Greek day names (`"Πέμπτη"`) are accepted as well, since existing
/// clients send the week start day that way.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_weekday;
/// use chrono::Weekday;
///
/// assert_eq!(parse_weekday("Thursday"), Some(Weekday::Thu));
/// assert_eq!(parse_weekday("sat"), Some(Weekday::Sat));
/// assert_eq!(parse_weekday("Πέμπτη"), Some(Weekday::Thu));
/// assert_eq!(parse_weekday("someday"), None);
/// ```
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim();
    name.parse::<Weekday>().ok().or_else(|| {
        GREEK_WEEKDAYS
            .iter()
            .find(|(greek, _)| *greek == name)
            .map(|&(_, day)| day)
    })
}

const GREEK_WEEKDAYS: [(&str, Weekday); 7] = [
    ("Δευτέρα", Weekday::Mon),
    ("Τρίτη", Weekday::Tue),
    ("Τετάρτη", Weekday::Wed),
    ("Πέμπτη", Weekday::Thu),
    ("Παρασκευή", Weekday::Fri),
    ("Σάββατο", Weekday::Sat),
    ("Κυριακή", Weekday::Sun),
];

/// A monetary amount for each day of the week.
///
/// Salary settings carry two of these tables: the base daily salary and the
/// hourly overtime rate, both of which may differ per weekday.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WeekdayAmounts;
/// use chrono::Weekday;
/// use rust_decimal::Decimal;
///
/// let amounts = WeekdayAmounts::uniform(Decimal::new(30, 0));
/// assert_eq!(amounts.get(Weekday::Sun), Decimal::new(30, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayAmounts {
    /// Amount for Monday.
    pub mon: Decimal,
    /// Amount for Tuesday.
    pub tue: Decimal,
    /// Amount for Wednesday.
    pub wed: Decimal,
    /// Amount for Thursday.
    pub thu: Decimal,
    /// Amount for Friday.
    pub fri: Decimal,
    /// Amount for Saturday.
    pub sat: Decimal,
    /// Amount for Sunday.
    pub sun: Decimal,
}

impl WeekdayAmounts {
    /// Creates a table with the same amount on every weekday.
    pub fn uniform(amount: Decimal) -> Self {
        Self {
            mon: amount,
            tue: amount,
            wed: amount,
            thu: amount,
            fri: amount,
            sat: amount,
            sun: amount,
        }
    }

    /// Returns the amount for the given weekday.
    pub fn get(&self, weekday: Weekday) -> Decimal {
        match weekday {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    /// Sets the amount for the given weekday.
    pub fn set(&mut self, weekday: Weekday, amount: Decimal) {
        let slot = match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = amount;
    }

    /// Iterates over `(weekday, amount)` pairs from Monday to Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Decimal)> + '_ {
        ALL_WEEKDAYS.iter().map(move |&day| (day, self.get(day)))
    }
}

/// The set of weekdays an employee regularly works.
///
/// Stored as a 7-bit mask (bit 0 = Monday). Serialized as a list of short
/// weekday keys, e.g. `["mon", "tue", "wed", "thu", "fri"]`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WorkSchedule;
/// use chrono::Weekday;
///
/// let schedule = WorkSchedule::monday_to_friday();
/// assert!(schedule.contains(Weekday::Wed));
/// assert!(!schedule.contains(Weekday::Sat));
/// assert_eq!(schedule.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WorkSchedule(u8);

impl WorkSchedule {
    /// A schedule with no workdays.
    pub const EMPTY: WorkSchedule = WorkSchedule(0);

    fn bit(weekday: Weekday) -> u8 {
        1 << weekday.num_days_from_monday()
    }

    /// The conventional Monday to Friday schedule.
    pub fn monday_to_friday() -> Self {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .collect()
    }

    /// Builds a schedule from a legacy "days per week" count.
    ///
    /// The first `days` weekdays starting from Monday are marked as
    /// workdays. Returns `None` when `days` is greater than 7.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::WorkSchedule;
    ///
    /// assert_eq!(WorkSchedule::from_days_per_week(5), Some(WorkSchedule::monday_to_friday()));
    /// assert_eq!(WorkSchedule::from_days_per_week(8), None);
    /// ```
    pub fn from_days_per_week(days: u8) -> Option<Self> {
        if days > 7 {
            return None;
        }
        Some(ALL_WEEKDAYS.iter().take(days as usize).copied().collect())
    }

    /// Returns true if the weekday is a scheduled workday.
    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & Self::bit(weekday) != 0
    }

    /// Marks the weekday as a scheduled workday.
    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= Self::bit(weekday);
    }

    /// Number of scheduled workdays per week.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if no weekday is scheduled.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the scheduled weekdays from Monday to Sunday.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        ALL_WEEKDAYS.into_iter().filter(move |&day| self.contains(day))
    }
}

impl FromIterator<Weekday> for WorkSchedule {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut schedule = WorkSchedule::EMPTY;
        for day in iter {
            schedule.insert(day);
        }
        schedule
    }
}

impl Serialize for WorkSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(weekday_key))
    }
}

impl<'de> Deserialize<'de> for WorkSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| {
                parse_weekday(name)
                    .ok_or_else(|| D::Error::custom(format!("unknown weekday '{}'", name)))
            })
            .collect()
    }
}
