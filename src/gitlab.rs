use serde::{de::DeserializeOwned, Deserialize, Deserializer};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Reads a field, falling back to its default when the value is null or has an unexpected type.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient")]
    pub web_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectAttributes {
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub action: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
}

/// Webhook body as GitLab sends it. Only the fields used for notifications are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub object_kind: String,
    #[serde(default, deserialize_with = "lenient")]
    pub user_username: String,
    #[serde(rename = "ref", default, deserialize_with = "lenient")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient")]
    pub total_commits_count: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub project: Project,
    #[serde(default, deserialize_with = "lenient")]
    pub object_attributes: ObjectAttributes,
    #[serde(default, deserialize_with = "lenient")]
    pub user: User,
    #[serde(default, deserialize_with = "lenient")]
    pub build_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub build_status: String,
    #[serde(default, deserialize_with = "lenient")]
    pub build_failure_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Push {
    pub actor: String,
    pub project_name: String,
    pub project_url: String,
    pub reference: String,
    pub total_commits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub actor: String,
    pub title: String,
    pub url: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub actor: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub project_name: String,
    pub build_name: String,
    pub status: String,
    pub url: String,
    pub failure_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Push(Push),
    MergeRequest(MergeRequest),
    Comment(Comment),
    Build(Build),
    Unknown,
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Push(_) => "push",
            Event::MergeRequest(_) => "merge_request",
            Event::Comment(_) => "note",
            Event::Build(_) => "build",
            Event::Unknown => "unknown",
        }
    }
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let RawEvent {
            object_kind,
            user_username,
            reference,
            total_commits_count,
            project,
            object_attributes,
            user,
            build_name,
            build_status,
            build_failure_reason,
        } = raw;

        match object_kind.as_str() {
            "push" => Event::Push(Push {
                actor: user_username,
                project_name: project.name,
                project_url: project.web_url,
                reference,
                total_commits: total_commits_count,
            }),
            "merge_request" => Event::MergeRequest(MergeRequest {
                actor: user.username,
                title: object_attributes.title,
                url: object_attributes.url,
                action: object_attributes.action,
            }),
            "note" => Event::Comment(Comment {
                actor: user.username,
                url: object_attributes.url,
            }),
            "build" => Event::Build(Build {
                project_name: project.name,
                build_name,
                status: build_status,
                url: object_attributes.url,
                failure_reason: build_failure_reason,
            }),
            _ => Event::Unknown,
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<Event, DecodeError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(DecodeError::Malformed(serde::de::Error::invalid_type(
            unexpected(&value),
            &"a JSON object",
        )));
    }
    Ok(RawEvent::deserialize(value)?.into())
}

fn unexpected(value: &serde_json::Value) -> serde::de::Unexpected<'_> {
    use serde::de::Unexpected;
    use serde_json::Value;

    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
