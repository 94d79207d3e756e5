//! Booking form choices: menu items, time slots and party sizes.

use chrono::NaiveTime;

pub const STARTERS: [&str; 3] = ["soup", "salad", "appetizer"];
pub const VEG_MAINS: [&str; 3] = ["vegetable-curry", "paneer-tikka", "mushroom-risotto"];
pub const NON_VEG_MAINS: [&str; 3] = ["chicken-curry", "grilled-fish", "beef-steak"];
pub const DESSERTS: [&str; 3] = ["ice-cream", "cake", "pudding"];

pub const MIN_PARTY: u32 = 1;
pub const MAX_PARTY: u32 = 6;

const FIRST_SLOT: (u32, u32) = (11, 0);
const LAST_SLOT: (u32, u32) = (22, 30);
const SLOT_MINUTES: u32 = 30;

pub fn mains(is_veg: bool) -> &'static [&'static str] {
    if is_veg {
        &VEG_MAINS
    } else {
        &NON_VEG_MAINS
    }
}

/// Bookable time slots as "HH:MM" labels, every half hour.
pub fn time_slots() -> Vec<String> {
    let first = FIRST_SLOT.0 * 60 + FIRST_SLOT.1;
    let last = LAST_SLOT.0 * 60 + LAST_SLOT.1;
    (first..=last)
        .step_by(SLOT_MINUTES as usize)
        .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
        .collect()
}

/// Normalizes a time such as "6:30" or "18:30" to its slot label.
pub fn parse_time_slot(input: &str) -> Result<String, String> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| format!("Invalid time '{}'. Use HH:MM.", input))?;
    let label = time.format("%H:%M").to_string();
    if time_slots().contains(&label) {
        Ok(label)
    } else {
        Err(format!(
            "No slot at {}. Slots run from 11:00 to 22:30 every 30 minutes.",
            label
        ))
    }
}

pub fn check_party_size(size: u32) -> Result<(), String> {
    if (MIN_PARTY..=MAX_PARTY).contains(&size) {
        Ok(())
    } else {
        Err(format!(
            "Party size must be between {} and {}",
            MIN_PARTY, MAX_PARTY
        ))
    }
}

pub fn check_choice(kind: &str, value: &str, options: &[&str]) -> Result<(), String> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {} '{}'. Valid options: {}",
            kind,
            value,
            options.join(", ")
        ))
    }
}
