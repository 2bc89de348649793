//! Extra-bed proration
//!
//! A per-day charge billed over `[extraBedStartDate ?? checkIn, checkOut)`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use shared::models::Booking;
use shared::money;

/// Billable nights for one extra bed, never negative
pub fn extra_bed_nights(start: Option<NaiveDate>, check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let from = start.unwrap_or(check_in);
    let days = (check_out - from).num_days();
    u32::try_from(days.max(0)).unwrap_or(0)
}

/// Extra-bed charge of a booking, summed over rooms with an extra bed
///
/// Bookings without per-room rates fall back to the booking-level flag,
/// billed from check-in.
pub fn extra_bed_charge(booking: &Booking) -> Decimal {
    let (Some(check_in), Some(check_out)) = (booking.check_in_date, booking.check_out_date) else {
        return Decimal::ZERO;
    };
    let per_day = money::to_decimal(booking.extra_bed_charge);
    if per_day <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut beds = booking.room_rates.iter().filter(|r| r.extra_bed).peekable();
    let nights: u32 = if beds.peek().is_some() {
        beds.map(|r| extra_bed_nights(r.extra_bed_start_date, check_in, check_out))
            .sum()
    } else if booking.extra_bed {
        extra_bed_nights(None, check_in, check_out)
    } else {
        0
    };
    per_day * Decimal::from(nights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_nights_from_start_or_check_in() {
        assert_eq!(extra_bed_nights(None, date(1), date(4)), 3);
        assert_eq!(extra_bed_nights(Some(date(3)), date(1), date(4)), 1);
        assert_eq!(extra_bed_nights(Some(date(6)), date(1), date(4)), 0);
    }

    #[test]
    fn test_charge_per_room() {
        let booking: Booking = serde_json::from_value(json!({
            "checkInDate": "2024-03-01",
            "checkOutDate": "2024-03-05",
            "extraBedCharge": 500,
            "roomRates": [
                {"roomNumber": "101", "extraBed": true},
                {"roomNumber": "102", "extraBed": true, "extraBedStartDate": "2024-03-03"},
                {"roomNumber": "103", "extraBed": false}
            ]
        }))
        .unwrap();
        // 4 nights + 2 nights
        assert_eq!(extra_bed_charge(&booking), Decimal::from(3000));
    }

    #[test]
    fn test_charge_booking_level_flag_and_missing_dates() {
        let mut booking: Booking = serde_json::from_value(json!({
            "checkInDate": "2024-03-01",
            "checkOutDate": "2024-03-03",
            "extraBed": true,
            "extraBedCharge": "750.5"
        }))
        .unwrap();
        assert_eq!(extra_bed_charge(&booking), Decimal::new(15010, 1));

        booking.check_out_date = None;
        assert_eq!(extra_bed_charge(&booking), Decimal::ZERO);
    }
}
