use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::records::sequential_ref;
use shared_utils::images::{content_type_for, decode_data_url};

use crate::models::{
    CreatePatientRecord, Patient, PatientCredentials, PatientError, UpdateProfileRequest,
    PATIENT_COLUMNS, PATIENT_REF_PREFIX,
};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create the patient row during registration. The sequential
    /// reference comes from counting existing rows (`PREFIX-(base+n)`).
    pub async fn create_patient(
        &self,
        record: CreatePatientRecord,
    ) -> Result<Patient, PatientError> {
        if self.email_exists(&record.email).await? {
            return Err(PatientError::DuplicateEmail);
        }

        let count = self
            .supabase
            .count("patients", None, None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;
        let patient_ref = sequential_ref(PATIENT_REF_PREFIX, count);

        let now = chrono::Utc::now().to_rfc3339();
        let row = json!({
            "id": Uuid::new_v4(),
            "patient_ref": patient_ref,
            "name": record.name,
            "email": record.email,
            "password": record.password_hash,
            "image_url": null,
            "phone": "000000000",
            "gender": "Not Selected",
            "dob": "Not Selected",
            "address": { "line1": "", "line2": "" },
            "emergency_contact": null,
            "created_at": now,
            "updated_at": now,
        });

        let created = self
            .supabase
            .insert("patients", None, row)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if created.is_empty() {
            return Err(PatientError::Database(
                "Failed to create patient".to_string(),
            ));
        }

        let patient = parse_patient(&created[0])?;
        info!("Patient {} registered as {}", patient.id, patient.patient_ref);
        Ok(patient)
    }

    pub async fn get_profile(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}&select={}",
            patient_id, PATIENT_COLUMNS
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(PatientError::NotFound);
        }

        parse_patient(&rows[0])
    }

    pub async fn update_profile(
        &self,
        patient_id: Uuid,
        request: UpdateProfileRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        let mut update = serde_json::Map::new();
        if let Some(name) = request.name {
            update.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = request.phone {
            update.insert("phone".to_string(), json!(phone));
        }
        if let Some(gender) = request.gender {
            update.insert("gender".to_string(), json!(gender));
        }
        if let Some(dob) = request.dob {
            update.insert("dob".to_string(), json!(dob));
        }
        if let Some(address) = request.address {
            update.insert("address".to_string(), json!(address));
        }
        if let Some(emergency_contact) = request.emergency_contact {
            update.insert("emergency_contact".to_string(), json!(emergency_contact));
        }

        if update.is_empty() {
            return Err(PatientError::Validation("Nothing to update".to_string()));
        }
        update.insert(
            "updated_at".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        let filter = format!("id=eq.{}&select={}", patient_id, PATIENT_COLUMNS);
        let updated = self
            .supabase
            .update("patients", &filter, Some(auth_token), Value::Object(update))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        let row = updated.into_iter().next().ok_or(PatientError::NotFound)?;
        parse_patient(&row)
    }

    /// Store the avatar in the profiles bucket and PATCH the public URL
    /// onto the patient row.
    pub async fn upload_avatar(
        &self,
        patient_id: Uuid,
        data_url: &str,
        auth_token: &str,
    ) -> Result<String, PatientError> {
        let (bytes, ext) = decode_data_url(data_url).map_err(PatientError::Validation)?;

        let object_path = format!("patients/{}/{}.{}", patient_id, Uuid::new_v4(), ext);
        debug!("Uploading avatar to {}", object_path);

        let public_url = self
            .supabase
            .upload_object(
                "profiles",
                &object_path,
                bytes,
                &content_type_for(ext),
                auth_token,
            )
            .await
            .map_err(|e| PatientError::ExternalService(e.to_string()))?;

        let filter = format!("id=eq.{}", patient_id);
        let updated = self
            .supabase
            .update(
                "patients",
                &filter,
                Some(auth_token),
                json!({
                    "image_url": public_url,
                    "updated_at": chrono::Utc::now().to_rfc3339(),
                }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if updated.is_empty() {
            return Err(PatientError::NotFound);
        }

        Ok(public_url)
    }

    /// Credential row for login; the only query that touches the
    /// password column.
    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<PatientCredentials>, PatientError> {
        let path = format!(
            "/rest/v1/patients?email=eq.{}&select=id,password",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Ok(None);
        }

        let credentials: PatientCredentials = serde_json::from_value(rows[0].clone())
            .map_err(|e| PatientError::Database(format!("Failed to parse credentials: {}", e)))?;
        Ok(Some(credentials))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, PatientError> {
        let path = format!(
            "/rest/v1/patients?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }
}

fn parse_patient(row: &Value) -> Result<Patient, PatientError> {
    serde_json::from_value(row.clone())
        .map_err(|e| PatientError::Database(format!("Failed to parse patient: {}", e)))
}
