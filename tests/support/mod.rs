#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use dopust::model::leave_request::{LeaveDetail, LeaveRequest, RequestStatus};
use dopust::models::Claims;
use dopust::repository::InMemoryRequestRepository;
use jsonwebtoken::{EncodingKey, Header, encode};

pub const SECRET: &str = "test-secret";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn token_for(user_id: u64, email: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs() as usize;
    let claims = Claims {
        id: user_id,
        email: email.to_string(),
        tip_uporabnika_id: 1,
        exp: now + 900,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn leave_request(id: u64, komentar: &str, stanje: RequestStatus) -> LeaveRequest {
    LeaveRequest {
        id,
        ime: String::new(),
        priimek: String::new(),
        email: String::new(),
        datum_zahteve: date(2024, 11, 25),
        stanje,
        komentar: komentar.to_string(),
        dopusti: vec![LeaveDetail {
            tip_dopusta: "Annual Leave".to_string(),
            zacetek: date(2024, 12, 1),
            konec: date(2024, 12, 10),
            razlog: "Vacation".to_string(),
        }],
    }
}

/// Two requesters: John (1) with requests 1 and 3, Alice (2) with request 2.
pub fn seeded_repo() -> InMemoryRequestRepository {
    InMemoryRequestRepository::new()
        .with_requester(1, "John", "Doe", "john.doe@example.com")
        .with_requester(2, "Alice", "Brown", "alice@example.com")
        .with_leave_types(["Annual Leave", "Sick Leave", "Parental Leave"])
        .with_request(1, leave_request(1, "Initial Comment", RequestStatus::InProgress))
        .with_request(2, leave_request(2, "", RequestStatus::Accepted))
        .with_request(1, leave_request(3, "", RequestStatus::Denied))
}
