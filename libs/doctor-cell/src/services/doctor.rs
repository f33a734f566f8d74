use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::images::{content_type_for, decode_data_url};
use shared_utils::password::{check_password_strength, hash_password};
use shared_utils::validation::is_valid_email;

use crate::models::{
    AddDoctorRequest, Doctor, DoctorCredentials, DoctorError, UpdateDoctorProfileRequest,
    DOCTOR_COLUMNS, DOCTOR_LISTING_COLUMNS,
};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Admin operation: validate, hash the password, upload the optional
    /// photo, insert with an empty slots map.
    pub async fn add_doctor(
        &self,
        request: AddDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        if !is_valid_email(&request.email) {
            return Err(DoctorError::Validation("Invalid email address".to_string()));
        }
        check_password_strength(&request.password).map_err(DoctorError::Validation)?;

        if self.email_exists(&request.email, auth_token).await? {
            return Err(DoctorError::DuplicateEmail);
        }

        let doctor_id = Uuid::new_v4();

        let image_url = match &request.image {
            Some(data_url) => Some(self.upload_photo(doctor_id, data_url, auth_token).await?),
            None => None,
        };

        let password_hash =
            hash_password(&request.password).map_err(|e| DoctorError::Validation(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let row = json!({
            "id": doctor_id,
            "name": request.name,
            "email": request.email,
            "password": password_hash,
            "image_url": image_url,
            "specialty": request.specialty,
            "degree": request.degree,
            "experience": request.experience,
            "about": request.about,
            "fee": request.fee,
            "available": true,
            "address": request.address,
            "slots_booked": {},
            "created_at": now,
            "updated_at": now,
        });

        let created = self
            .supabase
            .insert("doctors", Some(auth_token), row)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if created.is_empty() {
            return Err(DoctorError::Database("Failed to create doctor".to_string()));
        }

        let doctor = parse_doctor(&created[0])?;
        info!("Doctor {} created ({})", doctor.id, doctor.specialty);
        Ok(doctor)
    }

    /// Every doctor, password and slot bookkeeping excluded. Serves both
    /// the public portal list and the admin dashboard.
    pub async fn list_doctors(&self, auth_token: Option<&str>) -> Result<Vec<Doctor>, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?select={}&order=created_at.desc",
            DOCTOR_LISTING_COLUMNS
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        rows.iter().map(parse_doctor).collect()
    }

    pub async fn get_doctor(
        &self,
        doctor_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Doctor, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?id=eq.{}&select={}",
            doctor_id, DOCTOR_COLUMNS
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(DoctorError::NotFound);
        }

        parse_doctor(&rows[0])
    }

    /// Flip the `available` flag (admin or the doctor themself).
    pub async fn change_availability(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<bool, DoctorError> {
        let doctor = self.get_doctor(doctor_id, Some(auth_token)).await?;
        let next = !doctor.available;

        self.patch_doctor(doctor_id, json!({ "available": next }), auth_token)
            .await?;

        info!("Doctor {} availability set to {}", doctor_id, next);
        Ok(next)
    }

    pub async fn update_profile(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorProfileRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        let mut update = serde_json::Map::new();
        if let Some(fee) = request.fee {
            update.insert("fee".to_string(), json!(fee));
        }
        if let Some(address) = request.address {
            update.insert("address".to_string(), json!(address));
        }
        if let Some(about) = request.about {
            update.insert("about".to_string(), json!(about));
        }
        if let Some(available) = request.available {
            update.insert("available".to_string(), json!(available));
        }

        if update.is_empty() {
            return Err(DoctorError::Validation("Nothing to update".to_string()));
        }

        let updated = self
            .patch_doctor(doctor_id, Value::Object(update), auth_token)
            .await?;
        parse_doctor(&updated)
    }

    /// Credential row for login; the only query that touches the
    /// password column.
    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<DoctorCredentials>, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?email=eq.{}&select=id,password",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Ok(None);
        }

        let credentials: DoctorCredentials = serde_json::from_value(rows[0].clone())
            .map_err(|e| DoctorError::Database(format!("Failed to parse credentials: {}", e)))?;
        Ok(Some(credentials))
    }

    async fn email_exists(&self, email: &str, auth_token: &str) -> Result<bool, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    async fn upload_photo(
        &self,
        doctor_id: Uuid,
        data_url: &str,
        auth_token: &str,
    ) -> Result<String, DoctorError> {
        let (bytes, ext) = decode_data_url(data_url).map_err(DoctorError::Validation)?;

        let object_path = format!("doctors/{}/{}.{}", doctor_id, Uuid::new_v4(), ext);
        debug!("Uploading doctor photo to {}", object_path);

        self.supabase
            .upload_object(
                "profiles",
                &object_path,
                bytes,
                &content_type_for(ext),
                auth_token,
            )
            .await
            .map_err(|e| DoctorError::ExternalService(e.to_string()))
    }

    async fn patch_doctor(
        &self,
        doctor_id: Uuid,
        mut body: Value,
        auth_token: &str,
    ) -> Result<Value, DoctorError> {
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                "updated_at".to_string(),
                json!(chrono::Utc::now().to_rfc3339()),
            );
        }

        let filter = format!("id=eq.{}&select={}", doctor_id, DOCTOR_COLUMNS);
        let updated = self
            .supabase
            .update("doctors", &filter, Some(auth_token), body)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        updated.into_iter().next().ok_or(DoctorError::NotFound)
    }
}

fn parse_doctor(row: &Value) -> Result<Doctor, DoctorError> {
    serde_json::from_value(row.clone())
        .map_err(|e| DoctorError::Database(format!("Failed to parse doctor: {}", e)))
}
