use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

use super::date_format;

/// Review state of a leave request.
///
/// Stored and serialized in the canonical form (`"In Progress"`); parsing
/// ignores ASCII case so select values such as `"in progress"` are accepted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum RequestStatus {
    #[strum(serialize = "Accepted")]
    Accepted,
    #[strum(serialize = "Denied")]
    Denied,
    #[strum(serialize = "In Progress")]
    InProgress,
}

impl RequestStatus {
    pub const ALLOWED: &'static str = "Accepted, Denied, In Progress";

    /// Value bound to the status select control.
    pub fn select_value(&self) -> String {
        self.as_ref().to_lowercase()
    }

    pub fn parse(value: &str) -> Option<Self> {
        RequestStatus::from_str(value.trim()).ok()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RequestStatus::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid status `{raw}`, expected one of: {}",
                RequestStatus::ALLOWED
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveDetail {
    #[schema(example = "Annual Leave")]
    pub tip_dopusta: String,
    #[serde(with = "date_format")]
    #[schema(example = "2024-12-01", format = "date", value_type = String)]
    pub zacetek: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(example = "2024-12-10", format = "date", value_type = String)]
    pub konec: NaiveDate,
    #[serde(default)]
    #[schema(example = "Vacation")]
    pub razlog: String,
}

/// A leave request with its leave intervals, as served by the grouped fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "ime": "John",
    "priimek": "Doe",
    "email": "john.doe@example.com",
    "datum_zahteve": "2024-11-25",
    "stanje": "In Progress",
    "komentar": "",
    "dopusti": [{
        "tip_dopusta": "Annual Leave",
        "zacetek": "2024-12-01",
        "konec": "2024-12-10",
        "razlog": "Vacation"
    }]
}))]
pub struct LeaveRequest {
    pub id: u64,
    #[serde(default)]
    pub ime: String,
    #[serde(default)]
    pub priimek: String,
    pub email: String,
    #[serde(with = "date_format")]
    #[schema(format = "date", value_type = String)]
    pub datum_zahteve: NaiveDate,
    #[schema(value_type = String)]
    pub stanje: RequestStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub komentar: String,
    #[serde(default)]
    pub dopusti: Vec<LeaveDetail>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-requester counts by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserLeaveSummary {
    pub ime: String,
    pub priimek: String,
    pub email: String,
    #[serde(rename = "odobreniDopusti")]
    pub odobreni_dopusti: u64,
    #[serde(rename = "zavrnjeniDopusti")]
    pub zavrnjeni_dopusti: u64,
    #[serde(rename = "dopustiVObdelavi")]
    pub dopusti_v_obdelavi: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewLeaveDetail {
    #[schema(example = "Sick Leave")]
    pub tip_dopusta: String,
    #[serde(with = "date_format")]
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub zacetek: NaiveDate,
    #[serde(with = "date_format")]
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub konec: NaiveDate,
    #[serde(default)]
    pub razlog: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewLeaveRequest {
    pub dopusti: Vec<NewLeaveDetail>,
}

impl NewLeaveRequest {
    /// Returns the message to send back when the submission is not acceptable.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.dopusti.is_empty() {
            return Err("At least one leave entry is required");
        }
        if self.dopusti.iter().any(|d| d.zacetek > d.konec) {
            return Err("zacetek cannot be after konec");
        }
        if self.dopusti.iter().any(|d| d.tip_dopusta.trim().is_empty()) {
            return Err("tip_dopusta is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn status_parses_any_case_and_serializes_canonically() {
        assert_eq!(RequestStatus::parse("in progress"), Some(RequestStatus::InProgress));
        assert_eq!(RequestStatus::parse("ACCEPTED"), Some(RequestStatus::Accepted));
        assert_eq!(RequestStatus::parse(" denied "), Some(RequestStatus::Denied));
        assert_eq!(RequestStatus::parse("pending"), None);
        assert_eq!(RequestStatus::parse(""), None);

        assert_eq!(json!(RequestStatus::InProgress), json!("In Progress"));
    }

    #[test]
    fn select_values_are_lower_case() {
        let values: Vec<String> = RequestStatus::iter().map(|s| s.select_value()).collect();
        assert_eq!(values, vec!["accepted", "denied", "in progress"]);
    }

    #[test]
    fn leave_request_reads_frontend_shape() {
        let raw = json!({
            "id": 1,
            "email": "john.doe@example.com",
            "datum_zahteve": "2024-11-25T10:15:00.000Z",
            "stanje": "in progress",
            "komentar": null,
            "dopusti": [{
                "tip_dopusta": "Annual Leave",
                "zacetek": "2024-12-01",
                "konec": "2024-12-10",
                "razlog": "Vacation"
            }]
        });

        let request: LeaveRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(request.stanje, RequestStatus::InProgress);
        assert_eq!(request.komentar, "");
        assert_eq!(request.datum_zahteve, NaiveDate::from_ymd_opt(2024, 11, 25).unwrap());
        assert_eq!(request.dopusti.len(), 1);

        let back = serde_json::to_value(&request).unwrap();
        assert_eq!(back["stanje"], "In Progress");
        assert_eq!(back["datum_zahteve"], "2024-11-25");
        assert_eq!(back["dopusti"][0]["konec"], "2024-12-10");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = json!({
            "id": 2,
            "email": "a@b.c",
            "datum_zahteve": "2024-01-01",
            "stanje": "approved",
            "komentar": ""
        });
        assert!(serde_json::from_value::<LeaveRequest>(raw).is_err());
    }

    #[test]
    fn summary_uses_camel_case_counters() {
        let summary = UserLeaveSummary {
            ime: "John".into(),
            priimek: "Doe".into(),
            email: "john@example.com".into(),
            odobreni_dopusti: 2,
            zavrnjeni_dopusti: 1,
            dopusti_v_obdelavi: 0,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["odobreniDopusti"], 2);
        assert_eq!(value["zavrnjeniDopusti"], 1);
        assert_eq!(value["dopustiVObdelavi"], 0);
    }

    #[test]
    fn new_request_validation() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        let detail = |start, end| NewLeaveDetail {
            tip_dopusta: "Sick Leave".into(),
            zacetek: day(start),
            konec: day(end),
            razlog: String::new(),
        };

        assert!(NewLeaveRequest { dopusti: vec![] }.validate().is_err());
        assert!(NewLeaveRequest { dopusti: vec![detail(3, 1)] }.validate().is_err());
        assert!(NewLeaveRequest { dopusti: vec![detail(1, 1), detail(2, 5)] }.validate().is_ok());
    }
}
