//! Employee API Handlers
//!
//! Create/update accept multipart forms: the profile fields plus an
//! optional `face_image` file part. The face-embedding call, the
//! companion user account and the welcome email follow the best-effort
//! policy — the employee row is saved regardless, and secondary
//! failures come back as warnings next to the primary result.

use std::io::Cursor;

use axum::{
    Json,
    extract::{Extension, Multipart, Path, State},
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    EmployeeCreate, EmployeeForm, EmployeeResponse, EmployeeUpdate, Role, UserCreate,
};
use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::services::Warning;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Maximum face image size (5MB)
const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for stored photos
const JPEG_QUALITY: u8 = 85;

/// Employee plus the secondary-action outcomes of a create/update
#[derive(Debug, Serialize)]
pub struct EmployeeWithWarnings {
    pub employee: EmployeeResponse,
    pub warnings: Vec<Warning>,
}

/// List all employees
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all().await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeResponse>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))?;
    Ok(Json(employee.into()))
}

/// Parsed multipart payload: form fields + optional face image
struct EmployeePayload {
    form: EmployeeForm,
    image: Option<(String, Vec<u8>)>,
}

async fn parse_employee_multipart(mut multipart: Multipart) -> AppResult<EmployeePayload> {
    let mut form = EmployeeForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "face_image" => {
                let file_name = field.file_name().unwrap_or("face.jpg").to_string();
                let data = field.bytes().await?.to_vec();
                if !data.is_empty() {
                    image = Some((file_name, data));
                }
            }
            "name" => form.name = field.text().await?,
            "department" => form.department = Some(field.text().await?).filter(|s| !s.is_empty()),
            "role" => form.role = Some(field.text().await?).filter(|s| !s.is_empty()),
            "phone" => form.phone = Some(field.text().await?).filter(|s| !s.is_empty()),
            "email" => form.email = Some(field.text().await?).filter(|s| !s.is_empty()),
            _ => {}
        }
    }

    Ok(EmployeePayload { form, image })
}

fn validate_form(form: &EmployeeForm) -> AppResult<()> {
    validate_required_text(&form.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&form.department, "department", MAX_NAME_LEN)?;
    validate_optional_text(&form.role, "role", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&form.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&form.email, "email", MAX_EMAIL_LEN)?;
    form.validate()
        .map_err(|e| AppError::validation(format!("Invalid employee fields: {e}")))?;
    Ok(())
}

/// Re-encode the uploaded image as JPEG and store it under the photos dir.
/// Returns the public photo path.
async fn store_photo(state: &ServerState, data: Vec<u8>) -> AppResult<String> {
    if data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::validation(format!(
            "Face image too large (max {} bytes)",
            MAX_IMAGE_SIZE
        )));
    }

    let img = image::load_from_memory(&data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    }

    let photos_dir = state.config.photos_dir();
    tokio::fs::create_dir_all(&photos_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create photos directory: {e}")))?;

    let file_name = format!("emp_{}.jpg", Uuid::new_v4());
    tokio::fs::write(photos_dir.join(&file_name), &buffer)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save photo: {e}")))?;

    Ok(format!("/photos/{file_name}"))
}

/// Best-effort embedding fetch; failures degrade to a warning
async fn fetch_embedding(
    state: &ServerState,
    image: &(String, Vec<u8>),
    display_name: &str,
    warnings: &mut Vec<Warning>,
) -> Option<Vec<u8>> {
    match state
        .face
        .fetch_embedding(image.1.clone(), &image.0, display_name)
        .await
    {
        Ok(embedding) => {
            tracing::info!(employee = %display_name, "Face embedding extracted");
            Some(embedding)
        }
        Err(e) => {
            tracing::warn!(employee = %display_name, error = %e, "Face embedding unavailable");
            warnings.push(Warning::new("face", e.to_string()));
            None
        }
    }
}

/// Create a new employee
///
/// The phone-as-username conflict is rejected before any row is written.
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<EmployeeWithWarnings>> {
    let payload = parse_employee_multipart(multipart).await?;
    validate_form(&payload.form)?;

    let employees = EmployeeRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());
    let mut warnings = Vec::new();

    // The phone doubles as the login username — reject early
    if let Some(phone) = &payload.form.phone
        && users.find_by_username(phone).await?.is_some()
    {
        return Err(AppError::conflict(
            "This phone number is already used as a login account".to_string(),
        ));
    }

    // Photo + face embedding (best-effort)
    let mut photo_path = None;
    let mut face_embedding = None;
    if let Some(image) = &payload.image {
        photo_path = Some(store_photo(&state, image.1.clone()).await?);
        face_embedding =
            fetch_embedding(&state, image, &payload.form.name, &mut warnings).await;
    }

    let employee = employees
        .create(EmployeeCreate {
            name: payload.form.name.clone(),
            department: payload.form.department.clone(),
            role: payload.form.role.clone(),
            phone: payload.form.phone.clone(),
            email: payload.form.email.clone(),
            photo_path,
            face_embedding,
        })
        .await?;

    // Companion login account (username = phone, default password)
    if let Some(phone) = &payload.form.phone {
        let created = users
            .create(UserCreate {
                username: phone.clone(),
                password: state.config.default_password.clone(),
                role: Role::Employee,
                employee_id: Some(employee.id),
            })
            .await;
        match created {
            Ok(_) => {
                // Welcome email (best-effort, single attempt)
                if let Some(email) = &payload.form.email {
                    if let Err(e) = state
                        .mailer
                        .send_welcome(email, &employee.name, phone, &state.config.default_password)
                        .await
                    {
                        tracing::warn!(to = %email, error = %e, "Welcome email failed");
                        warnings.push(Warning::new("email", e.to_string()));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(employee_id = employee.id, error = %e, "User account creation failed");
                warnings.push(Warning::new("account", e.to_string()));
            }
        }
    }

    tracing::info!(
        employee_id = employee.id,
        name = %employee.name,
        warnings = warnings.len(),
        "Employee created"
    );

    Ok(Json(EmployeeWithWarnings {
        employee: employee.into(),
        warnings,
    }))
}

/// Update an employee
///
/// A new face image replaces the photo and embedding; when the
/// embedding call fails, the previous embedding is kept and a warning
/// is returned.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<EmployeeWithWarnings>> {
    let payload = parse_employee_multipart(multipart).await?;
    validate_form(&payload.form)?;

    let employees = EmployeeRepository::new(state.db.clone());
    employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))?;

    let mut warnings = Vec::new();
    let mut photo_path = None;
    let mut face_embedding = None;
    if let Some(image) = &payload.image {
        photo_path = Some(store_photo(&state, image.1.clone()).await?);
        face_embedding =
            fetch_embedding(&state, image, &payload.form.name, &mut warnings).await;
    }

    let employee = employees
        .update(
            id,
            EmployeeUpdate {
                name: payload.form.name.clone(),
                department: payload.form.department.clone(),
                role: payload.form.role.clone(),
                phone: payload.form.phone.clone(),
                email: payload.form.email.clone(),
                photo_path,
                face_embedding,
            },
        )
        .await?;

    tracing::info!(employee_id = id, "Employee updated");

    Ok(Json(EmployeeWithWarnings {
        employee: employee.into(),
        warnings,
    }))
}

/// Delete an employee and its companion login account
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))?;

    users.delete_by_employee(id).await?;
    let deleted = employees.delete(id).await?;

    tracing::info!(
        employee_id = id,
        deleted_by = current.id,
        "Employee deleted"
    );
    Ok(Json(deleted))
}

/// Soft-disable an employee
pub async fn lock(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeResponse>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.set_locked(id, true).await?;
    tracing::info!(employee_id = id, name = %employee.name, "Employee locked");
    Ok(Json(employee.into()))
}

/// Re-enable a locked employee
pub async fn unlock(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeResponse>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.set_locked(id, false).await?;
    tracing::info!(employee_id = id, name = %employee.name, "Employee unlocked");
    Ok(Json(employee.into()))
}
