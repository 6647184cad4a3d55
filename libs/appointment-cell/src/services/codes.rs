use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;

use shared_models::scheduling::Appointment;

use crate::models::SchedulingError;

const CONFIRMATION_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CONFIRMATION_CODE_LEN: usize = 6;
const BOOKING_SUFFIX_DIGITS: usize = 4;
const MAX_ATTEMPTS: usize = 64;

pub fn generate_confirmation_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CONFIRMATION_ALPHABET[rng.gen_range(0..CONFIRMATION_ALPHABET.len())] as char)
        .collect()
}

/// `APPT-<YYYYMMDD>-<4 digits>`, dated by the day the booking is made.
pub fn generate_booking_id<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> String {
    let suffix: String = (0..BOOKING_SUFFIX_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("APPT-{}-{}", today.format("%Y%m%d"), suffix)
}

/// Draws a booking id and confirmation code that no existing appointment uses.
pub fn allocate_identifiers<R: Rng + ?Sized>(
    today: NaiveDate,
    existing: &[Appointment],
    rng: &mut R,
) -> Result<(String, String), SchedulingError> {
    let used_ids: HashSet<&str> = existing.iter().map(|a| a.booking_id.as_str()).collect();
    let used_codes: HashSet<&str> = existing.iter().map(|a| a.confirmation_code.as_str()).collect();

    let booking_id = draw_unused(&used_ids, || generate_booking_id(today, rng))
        .ok_or_else(|| SchedulingError::Internal(format!("no free booking id left for {}", today)))?;
    let confirmation_code = draw_unused(&used_codes, || generate_confirmation_code(rng))
        .ok_or_else(|| SchedulingError::Internal("could not draw an unused confirmation code".to_string()))?;

    Ok((booking_id, confirmation_code))
}

fn draw_unused<F>(used: &HashSet<&str>, mut draw: F) -> Option<String>
where
    F: FnMut() -> String,
{
    (0..MAX_ATTEMPTS)
        .map(|_| draw())
        .find(|candidate| !used.contains(candidate.as_str()))
}
