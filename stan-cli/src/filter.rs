use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use stan_core::{BookingItem, BookingType, Statement};
use std::io::{self, Write};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date (inclusive), e.g. '2022-09-01'
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End date (exclusive), e.g. '2023-01-01'
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Keep only booking items of this type
    #[arg(long = "type")]
    pub booking_type: Option<BookingType>,

    /// Remove all booking items of this type
    #[arg(long = "type-not")]
    pub booking_type_not: Option<BookingType>,

    /// Keep only booking items whose info matches this regex (case-insensitive)
    #[arg(long)]
    pub info_matches: Option<String>,

    /// Remove all booking items whose info matches this regex (case-insensitive)
    #[arg(long)]
    pub info_matches_not: Option<String>,

    /// Keep only bookings less than or equal to this amount
    #[arg(long, allow_negative_numbers = true)]
    pub less_or_equal: Option<Decimal>,

    /// Keep only bookings greater than or equal to this amount
    #[arg(long, allow_negative_numbers = true)]
    pub greater_or_equal: Option<Decimal>,
}

fn info_regex(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("invalid info pattern '{p}'"))
        })
        .transpose()
}

#[derive(Debug)]
pub struct BookingFilter {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    booking_type: Option<BookingType>,
    booking_type_not: Option<BookingType>,
    info: Option<Regex>,
    info_not: Option<Regex>,
    max: Option<Decimal>,
    min: Option<Decimal>,
}

impl BookingFilter {
    pub fn new(args: &FilterArgs) -> Result<Self> {
        Ok(Self {
            from: args.from,
            to: args.to,
            booking_type: args.booking_type,
            booking_type_not: args.booking_type_not,
            info: info_regex(args.info_matches.as_deref())?,
            info_not: info_regex(args.info_matches_not.as_deref())?,
            max: args.less_or_equal,
            min: args.greater_or_equal,
        })
    }

    /// All criteria are checked against the value date and the joined info.
    pub fn matches(&self, item: &BookingItem) -> bool {
        let info = item.joined_info();
        let kind = item.booking_type();

        self.from.is_none_or(|from| item.value_date >= from)
            && self.to.is_none_or(|to| item.value_date < to)
            && self.booking_type.is_none_or(|t| t == kind)
            && self.booking_type_not != Some(kind)
            && self.info.as_ref().is_none_or(|re| re.is_match(&info))
            && !self.info_not.as_ref().is_some_and(|re| re.is_match(&info))
            && self.max.is_none_or(|max| item.amount <= max)
            && self.min.is_none_or(|min| item.amount >= min)
    }

    pub fn apply<'a>(&self, statements: &'a [Statement]) -> Vec<&'a BookingItem> {
        statements
            .iter()
            .flat_map(|st| &st.bookings)
            .filter(|item| self.matches(item))
            .collect()
    }
}

/// One block per booking, then the sum of all amounts.
pub fn write_report(bookings: &[&BookingItem], out: &mut dyn Write) -> io::Result<()> {
    for item in bookings {
        writeln!(out, "{} : {} : {:.2}", item.value_date, item.booking_type(), item.amount)?;
        for line in &item.info {
            writeln!(out, "    {line}")?;
        }
        writeln!(out)?;
    }

    let sum: Decimal = bookings.iter().map(|item| item.amount).sum();
    writeln!(out, "Sum: {sum:.2}")
}
