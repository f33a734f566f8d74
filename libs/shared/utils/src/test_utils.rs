use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            admin_email: "admin@astracare.test".to_string(),
            admin_password: "astra-admin-password".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the config at a wiremock server standing in for PostgREST.
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            token_ttl_hours: 24,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: Role::Patient,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role.to_string(),
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST rows for wiremock-backed tests.
pub struct MockSupabaseRows;

impl MockSupabaseRows {
    pub fn doctor_row(doctor_id: &str, email: &str, name: &str) -> Value {
        json!({
            "id": doctor_id,
            "name": name,
            "email": email,
            "image_url": null,
            "specialty": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Experienced general physician",
            "fee": 50.0,
            "available": true,
            "address": { "line1": "17th Cross, Richmond", "line2": "Circle, Ring Road" },
            "slots_booked": {},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row_with_slots(doctor_id: &str, slot_date: &str, times: &[&str]) -> Value {
        let mut row = Self::doctor_row(doctor_id, "doctor@example.com", "Dr. Test");
        row["slots_booked"] = json!({ slot_date: times });
        row
    }

    pub fn patient_row(patient_id: &str, email: &str, name: &str) -> Value {
        json!({
            "id": patient_id,
            "patient_ref": "ASTRA-PT-1001",
            "name": name,
            "email": email,
            "image_url": null,
            "phone": "000000000",
            "gender": "Not Selected",
            "dob": "Not Selected",
            "address": { "line1": "", "line2": "" },
            "emergency_contact": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        user_id: &str,
        doctor_id: &str,
        slot_date: &str,
        slot_time: &str,
    ) -> Value {
        json!({
            "id": appointment_id,
            "user_id": user_id,
            "doctor_id": doctor_id,
            "slot_date": slot_date,
            "slot_time": slot_time,
            "user_data": Self::patient_row(user_id, "patient@example.com", "Test Patient"),
            "doc_data": Self::doctor_row(doctor_id, "doctor@example.com", "Dr. Test"),
            "amount": 50.0,
            "booked_at": "2024-01-01T00:00:00Z",
            "cancelled": false,
            "is_completed": false,
            "payment": false
        })
    }

    pub fn staff_row(staff_id: &str, category: &str, staff_ref: &str) -> Value {
        json!({
            "id": staff_id,
            "staff_ref": staff_ref,
            "category": category,
            "name": "Test Staffer",
            "email": "staff@example.com",
            "phone": "000000000",
            "image_url": null,
            "address": { "line1": "", "line2": "" },
            "department": "General",
            "shift": "morning",
            "salary": 30000.0,
            "doctor_id": null,
            "joined_on": "2024-01-01",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }
}
