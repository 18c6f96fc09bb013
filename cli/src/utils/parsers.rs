use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use civic_ledger::{EventKind, EventStatus, Role, TemplateKind, VoteChoice};
use uuid::Uuid;

/// Accepts RFC 3339, `now`, or an offset from now such as `+90m`, `-1h`, `+7d`.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    parse_time_at(s, Utc::now())
}

pub fn parse_time_at(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Some(sign) = s.chars().next().filter(|c| *c == '+' || *c == '-') {
        let body = &s[1..];
        let (split, unit) = body
            .char_indices()
            .next_back()
            .ok_or_else(|| format!("invalid offset: {}", s))?;
        let amount: i64 = body[..split]
            .parse()
            .map_err(|e| format!("invalid offset {}: {}", s, e))?;
        let offset = match unit {
            's' => Duration::try_seconds(amount),
            'm' => Duration::try_minutes(amount),
            'h' => Duration::try_hours(amount),
            'd' => Duration::try_days(amount),
            _ => return Err(format!("invalid offset unit in {}: expected s, m, h or d", s)),
        }
        .ok_or_else(|| format!("offset out of range: {}", s))?;
        let shifted = if sign == '+' {
            now.checked_add_signed(offset)
        } else {
            now.checked_sub_signed(offset)
        };
        return shifted.ok_or_else(|| format!("offset out of range: {}", s));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid time {}: {}", s, e))
}

pub fn parse_uuid(s: &str) -> Result<Uuid, String> {
    Uuid::from_str(s.trim()).map_err(|e| format!("invalid id: {e}"))
}

/// Numbers select by position, anything else by option text.
pub fn parse_vote_choice(s: &str) -> Result<VoteChoice, String> {
    vote_choice(s, false)
}

/// Like [`parse_vote_choice`], but with `by_value` a number is matched as
/// option text, for ballots whose options are themselves numbers.
pub fn vote_choice(s: &str, by_value: bool) -> Result<VoteChoice, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("vote option must not be blank".to_string());
    }
    Ok(match s.parse::<usize>() {
        Ok(index) if !by_value => VoteChoice::Index(index),
        _ => VoteChoice::Value(s.to_string()),
    })
}

pub fn parse_template_kind(s: &str) -> Result<TemplateKind, String> {
    TemplateKind::from_str(&s.to_lowercase()).map_err(|e| e.to_string())
}

pub fn parse_event_kind(s: &str) -> Result<EventKind, String> {
    EventKind::from_str(&s.to_lowercase()).map_err(|e| e.to_string())
}

pub fn parse_role(s: &str) -> Result<Role, String> {
    Role::from_str(&s.to_lowercase()).map_err(|e| e.to_string())
}

pub fn parse_status(s: &str) -> Result<EventStatus, String> {
    EventStatus::from_str(&s.to_lowercase()).map_err(|e| e.to_string())
}
