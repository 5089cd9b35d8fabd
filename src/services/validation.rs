use crate::error::{AppError, AppResult};

pub const NAME_MAX: usize = 100;
pub const PHONE_MAX: usize = 20;
pub const EMAIL_MAX: usize = 100;
pub const SUBJECT_MAX: usize = 200;
pub const IMAGE_MAX: usize = 255;

/// Reject values longer than the column they land in. Counts characters,
/// not bytes, matching `VARCHAR(n)`.
pub fn check_len(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_inclusive() {
        assert!(check_len("name", &"a".repeat(NAME_MAX), NAME_MAX).is_ok());
        assert!(check_len("name", &"a".repeat(NAME_MAX + 1), NAME_MAX).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 20 characters, 40 bytes
        let phone = "é".repeat(PHONE_MAX);
        assert!(check_len("customer_phone", &phone, PHONE_MAX).is_ok());
    }

    #[test]
    fn message_names_the_field() {
        match check_len("customer_phone", "+62 812-3456-7890 ext. 12", PHONE_MAX) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "customer_phone must be at most 20 characters")
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
