use axum::body::Bytes;

use crate::{error::AppError, models::Submission};

/// Decodes an urlencoded form body. Repeated `sujets` keys are all kept, for
/// every other field the first occurrence wins and unknown keys are ignored.
pub fn get_submission_from_body(body: &Bytes) -> Result<Submission, AppError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|_| AppError::MalformedPayload)?;

    let mut submission = Submission::default();

    for (key, value) in pairs {
        let slot = match key.as_str() {
            "prenom" => &mut submission.given_name,
            "nom" => &mut submission.family_name,
            "email" => &mut submission.email,
            "message" => &mut submission.message,
            "pays" => &mut submission.country,
            "genre" => &mut submission.gender,
            "spam" => &mut submission.honeypot,
            "sujets" => {
                submission.topics.push(value);
                continue;
            }
            _ => continue,
        };

        slot.get_or_insert(value);
    }

    Ok(submission)
}
