use chrono::TimeDelta;
use isochron::{Clock, LocalDate, MonthDay, Period, ZoneId, SHORT_IDS};

fn main() -> isochron::Result<()> {
    let clock = Clock::tick(Clock::system_default_zone(), TimeDelta::seconds(1))?;
    let today = LocalDate::now(&clock)?;
    let new_year = LocalDate::of(today.year() + 1, 1, 1)?;
    let birthday = MonthDay::of(2, 29)?;
    let zone = ZoneId::of_with_aliases("EST", &SHORT_IDS)?;

    println!("Clock: {clock}");
    println!("Today: {today} ({})", today.day_of_week());
    println!("Until new year: {}", Period::between(&today, &new_year)?);
    println!("Feb 29 birthday this year: {}", birthday.at_year(today.year())?);
    println!("In 1 month 31 days: {}", "P1M31D".parse::<Period>()?.add_to(today)?);
    println!("EST is {} ({})", zone, zone.normalized());
    Ok(())
}
