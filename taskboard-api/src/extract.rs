//! Request extractors that reject with [`ApiError`]
//!
//! Axum's built-in rejections answer in plain text. These wrappers turn
//! malformed paths, query strings and bodies into the 400 error envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{
    de::{DeserializeOwned, Error as _, IntoDeserializer},
    Deserialize, Deserializer,
};
use validator::Validate;

use crate::error::ApiError;

/// `Path` with an envelope rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` with an envelope rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// JSON body that must also pass its `Validate` rules
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `deserialize_with` helper: trims surrounding whitespace
///
/// NUL characters are rejected; PostgreSQL text columns cannot store them.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.contains('\0') {
        return Err(D::Error::custom("text must not contain NUL characters"));
    }
    Ok(value.trim().to_string())
}

/// `deserialize_with` helper: trims, and maps blank or null to `None`
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    if value.as_deref().is_some_and(|v| v.contains('\0')) {
        return Err(D::Error::custom("text must not contain NUL characters"));
    }
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// `deserialize_with` helper for optional dates
///
/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date, which is
/// stored as midnight UTC. Blank or null means no date.
pub fn date_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| {
            D::Error::custom(format!(
                "invalid date '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                raw
            ))
        })
}

/// `deserialize_with` helper: an empty value counts as absent
///
/// Query strings send `?status=` for "no filter".
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            T::deserialize(raw.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::post, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Deserialize, Validate)]
    struct Named {
        #[serde(default, deserialize_with = "trimmed")]
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[derive(Deserialize)]
    struct Described {
        #[serde(default, deserialize_with = "trimmed_opt")]
        description: Option<String>,
    }

    fn app() -> Router {
        Router::new().route(
            "/items/:id",
            post(|ApiPath(id): ApiPath<Uuid>, ValidatedJson(body): ValidatedJson<Named>| async move {
                format!("{id}:{}", body.name)
            }),
        )
    }

    async fn send(uri: &str, body: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[derive(Deserialize)]
    struct Dated {
        #[serde(default, deserialize_with = "date_opt")]
        due: Option<DateTime<Utc>>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Colour {
        Red,
    }

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "blank_as_none")]
        colour: Option<Colour>,
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        assert!(serde_json::from_str::<Named>(r#"{"name":"a\u0000b"}"#).is_err());
        assert!(serde_json::from_str::<Described>(r#"{"description":"a\u0000b"}"#).is_err());
    }

    #[test]
    fn test_date_opt_accepts_plain_dates_and_timestamps() {
        let plain: Dated = serde_json::from_str(r#"{"due":"2030-01-15"}"#).unwrap();
        assert_eq!(plain.due.unwrap().to_rfc3339(), "2030-01-15T00:00:00+00:00");

        let js: Dated = serde_json::from_str(r#"{"due":"2030-01-15T09:30:00.000Z"}"#).unwrap();
        assert_eq!(js.due.unwrap().to_rfc3339(), "2030-01-15T09:30:00+00:00");

        let offset: Dated = serde_json::from_str(r#"{"due":"2030-01-15T09:30:00+02:00"}"#).unwrap();
        assert_eq!(offset.due.unwrap().to_rfc3339(), "2030-01-15T07:30:00+00:00");

        for raw in [r#"{"due":""}"#, r#"{"due":null}"#, "{}"] {
            let d: Dated = serde_json::from_str(raw).unwrap();
            assert!(d.due.is_none(), "{raw}");
        }

        for raw in [r#"{"due":"tomorrow"}"#, r#"{"due":"2030-13-01"}"#, r#"{"due":"15/01/2030"}"#] {
            assert!(serde_json::from_str::<Dated>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_blank_as_none_in_query_strings() {
        let blank: Filter = filter_from("colour=");
        assert!(blank.colour.is_none());

        let absent: Filter = filter_from("");
        assert!(absent.colour.is_none());

        let set: Filter = filter_from("colour=red");
        assert_eq!(set.colour, Some(Colour::Red));
    }

    fn filter_from(query: &str) -> Filter {
        let uri: axum::http::Uri = format!("/?{query}").parse().unwrap();
        axum::extract::Query::<Filter>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_blank_as_none_rejects_unknown_values() {
        let uri: axum::http::Uri = "/?colour=blue".parse().unwrap();
        assert!(axum::extract::Query::<Filter>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn test_trimming_helpers() {
        let named: Named = serde_json::from_str(r#"{"name":"  Alpha  "}"#).unwrap();
        assert_eq!(named.name, "Alpha");

        let missing: Named = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.name, "");

        for raw in [r#"{"description":"   "}"#, r#"{"description":null}"#, "{}"] {
            let d: Described = serde_json::from_str(raw).unwrap();
            assert!(d.description.is_none(), "{raw}");
        }

        let d: Described = serde_json::from_str(r#"{"description":" Beta "}"#).unwrap();
        assert_eq!(d.description.as_deref(), Some("Beta"));
    }

    #[tokio::test]
    async fn test_whitespace_only_name_fails_validation() {
        let (status, _) = send(&format!("/items/{}", Uuid::new_v4()), r#"{"name":"   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_valid_request_passes() {
        let id = Uuid::new_v4();
        let (status, body) = send(&format!("/items/{id}"), r#"{"name":"x"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{id}:x"));
    }

    #[tokio::test]
    async fn test_bad_path_id_is_400_envelope() {
        let (status, body) = send("/items/not-a-uuid", r#"{"name":"x"}"#).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_envelope() {
        let (status, body) = send(&format!("/items/{}", Uuid::new_v4()), "{").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_failed_validation_lists_fields() {
        let (status, body) = send(&format!("/items/{}", Uuid::new_v4()), r#"{"name":""}"#).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["field"], "name");
        assert_eq!(json["errors"][0]["message"], "Name is required");
    }
}
