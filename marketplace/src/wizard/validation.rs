//! Step guards and draft-to-request conversion.

use super::types::{DetailsForm, EventForm, ImageFile, WizardState, WizardStep};
use crate::error::ValidationError;
use crate::types::{EventId, ListingStatus, Money, NewEvent, NewListing, UserId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MIB: u64 = 1024 * 1024;

/// Split free-text seat numbers on commas
///
/// Tokens are trimmed and empty ones dropped; `None` if nothing is left.
#[must_use]
pub fn parse_seat_numbers(text: &str) -> Option<Vec<String>> {
    let seats: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|seat| !seat.is_empty())
        .map(str::to_string)
        .collect();
    (!seats.is_empty()).then_some(seats)
}

/// Any finite decimal number, `"1e2"` included
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Asking price: any number above zero
///
/// The amount is rounded to the nearest cent; a positive price never
/// rounds below one cent.
///
/// # Errors
///
/// [`ValidationError::InvalidPrice`] if empty, not a number, or not positive.
pub fn parse_price(text: &str) -> Result<Money, ValidationError> {
    parse_number(text)
        .filter(|amount| *amount > 0.0)
        .and_then(Money::from_major_units)
        .map(|price| price.max(Money::from_cents(1)))
        .ok_or(ValidationError::InvalidPrice)
}

/// Original (face-value) price: any number not below zero, to the nearest cent
///
/// # Errors
///
/// [`ValidationError::InvalidOriginalPrice`] if not a number or negative.
pub fn parse_original_price(text: &str) -> Result<Money, ValidationError> {
    parse_number(text)
        .filter(|amount| *amount >= 0.0)
        .and_then(Money::from_major_units)
        .ok_or(ValidationError::InvalidOriginalPrice)
}

/// Guard for leaving `state.step` forwards
///
/// # Errors
///
/// The validation message to show.
pub fn check_forward(state: &WizardState) -> Result<(), ValidationError> {
    match state.step {
        WizardStep::EventSelection if state.selected_event.is_none() => {
            Err(ValidationError::NoEventSelected)
        },
        WizardStep::ImageUpload if state.images.is_empty() => Err(ValidationError::NoImages),
        WizardStep::Details => parse_price(&state.details.price).map(|_| ()),
        WizardStep::EventSelection | WizardStep::ImageUpload | WizardStep::Review => Ok(()),
    }
}

/// Whether a batch of `incoming` files fits under the image cap
///
/// Uploads still in flight count against the cap.
///
/// # Errors
///
/// [`ValidationError::TooManyImages`] if the batch would overflow.
pub const fn check_batch(
    uploaded: usize,
    in_flight: usize,
    incoming: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if uploaded + in_flight + incoming > max {
        Err(ValidationError::TooManyImages { max })
    } else {
        Ok(())
    }
}

/// Per-file checks: declared image type and size ceiling
///
/// # Errors
///
/// [`ValidationError::NotAnImage`] or [`ValidationError::FileTooLarge`].
pub fn check_image(file: &ImageFile, max_bytes: u64) -> Result<(), ValidationError> {
    if !file.content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            file: file.name.clone(),
        });
    }
    if file.size() > max_bytes {
        return Err(ValidationError::FileTooLarge {
            file: file.name.clone(),
            max_mib: max_bytes / MIB,
        });
    }
    Ok(())
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Event date as typed in the form, read as UTC
///
/// # Errors
///
/// [`ValidationError::InvalidEventDate`] for any other format.
pub fn parse_event_date(text: &str) -> Result<DateTime<Utc>, ValidationError> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
        return Ok(date.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
        .ok_or(ValidationError::InvalidEventDate)
}

/// Insert payload for the create-event form
///
/// # Errors
///
/// [`ValidationError::MissingEventFields`] if title, date, location or
/// category is blank; [`ValidationError::InvalidEventDate`] if the date
/// does not parse.
pub fn build_event(form: &EventForm) -> Result<NewEvent, ValidationError> {
    let (Some(title), Some(date), Some(location), Some(category)) = (
        optional(&form.title),
        optional(&form.date),
        optional(&form.location),
        optional(&form.category),
    ) else {
        return Err(ValidationError::MissingEventFields);
    };

    Ok(NewEvent {
        title,
        description: optional(&form.description),
        date: parse_event_date(&date)?,
        location,
        category,
        venue: optional(&form.venue),
        city: optional(&form.city),
        state: optional(&form.state),
        country: "US".to_string(),
    })
}

/// Insert payload for the draft
///
/// # Errors
///
/// The first field that does not parse.
pub fn build_listing(
    event_id: EventId,
    seller_id: UserId,
    images: &[String],
    details: &DetailsForm,
) -> Result<NewListing, ValidationError> {
    let price = parse_price(&details.price)?;
    let original_price = optional(&details.original_price)
        .map(|text| parse_original_price(&text))
        .transpose()?;
    let quantity = match details.quantity.trim().parse::<u32>() {
        Ok(quantity) if quantity >= 1 => quantity,
        _ => return Err(ValidationError::InvalidQuantity),
    };

    Ok(NewListing {
        event_id,
        seller_id,
        price,
        original_price,
        quantity,
        available_quantity: quantity,
        section: optional(&details.section),
        row: optional(&details.row),
        seat_numbers: parse_seat_numbers(&details.seat_numbers),
        ticket_type: details.ticket_type,
        delivery_method: details.delivery_method,
        images: images.to_vec(),
        notes: optional(&details.notes),
        status: ListingStatus::Active,
    })
}
