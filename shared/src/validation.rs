//! Form validation for the Gas Certificate Manager
//!
//! Field rules plug into `validator` derives on the input models; messages
//! are Spanish because they are shown next to the form fields.

use std::borrow::Cow;

use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::CertificateInput;
use crate::types::FieldError;

/// Length of a local phone number
pub const PHONE_DIGITS: usize = 9;

/// Minimum password length on the settings page
pub const MIN_PASSWORD_LEN: usize = 8;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// ============================================================================
// Plain checks
// ============================================================================

/// Exactly nine ASCII digits
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// ============================================================================
// Field validators
// ============================================================================

/// Non-blank text
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Este campo es obligatorio"));
    }
    Ok(())
}

/// Required nine-digit phone
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(error("required", "El teléfono es obligatorio"));
    }
    validate_optional_phone(phone)
}

/// Nine-digit phone, only checked when present
pub fn validate_optional_phone(phone: &str) -> Result<(), ValidationError> {
    if !is_valid_phone(phone) {
        return Err(error("phone", "El teléfono debe tener 9 dígitos"));
    }
    Ok(())
}

/// Required, well-formed email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(error("required", "El email es obligatorio"));
    }
    if !is_valid_email(email) {
        return Err(error("email", "El email no es válido"));
    }
    Ok(())
}

/// New password strength
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(error(
            "password",
            "La contraseña debe tener al menos 8 caracteres",
        ));
    }
    Ok(())
}

/// At least one positive alert threshold
pub fn validate_alert_days(days: &[u32]) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(error("required", "Debe indicar al menos un aviso"));
    }
    if days.iter().any(|&d| d == 0) {
        return Err(error("alert_days", "Los avisos deben ser mayores que cero"));
    }
    Ok(())
}

/// A client must be selected
pub fn validate_client_ref(client_id: &Uuid) -> Result<(), ValidationError> {
    if client_id.is_nil() {
        return Err(error("required", "Debe seleccionar un cliente"));
    }
    Ok(())
}

/// An explicit expiry date must come after the issue date
pub fn validate_certificate_dates(input: &CertificateInput) -> Result<(), ValidationError> {
    if let Some(expiry) = input.expiry_date {
        if expiry <= input.issue_date {
            let mut err = error(
                "expiry_before_issue",
                "La fecha de caducidad debe ser posterior a la de emisión",
            );
            err.add_param(Cow::Borrowed("field"), &"expiry_date");
            return Err(err);
        }
    }
    Ok(())
}

// ============================================================================
// Error collection
// ============================================================================

/// Field-specific wording for generic `required` errors
fn required_message(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("El nombre es obligatorio"),
        "address" => Some("La dirección es obligatoria"),
        "username" => Some("El usuario es obligatorio"),
        "company.name" => Some("El nombre de la empresa es obligatorio"),
        _ => None,
    }
}

/// Run the derived validation and flatten it into a sorted list of field errors
pub fn validate_input<T: Validate>(input: &T) -> Result<(), Vec<FieldError>> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut out = Vec::new();
            collect(&errors, "", &mut out);
            out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
            Err(out)
        }
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    out.push(to_field_error(&path, err));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn to_field_error(path: &str, err: &ValidationError) -> FieldError {
    // schema-level errors name their field in a param
    let field = err
        .params
        .get("field")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string());

    let message = match (err.code.as_ref(), required_message(&field)) {
        ("required", Some(specific)) => specific.to_string(),
        _ => err
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Valor no válido ({})", err.code)),
    };

    FieldError {
        field,
        code: err.code.to_string(),
        message,
    }
}
