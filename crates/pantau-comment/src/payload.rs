//! JSON bodies sent to the comment endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::resource::ResourceRef;
use crate::Result;

/// Body of a new comment or reply.
///
/// `foto` is left out on purpose: the server looks the photo up from the
/// biography record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    /// Display name.
    pub nama: String,
    /// Comment text.
    pub konten: String,
    /// Profile photo reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,
    /// Biography of the acting user; serialized as `null` when absent.
    pub biografi_id: Option<i64>,
    /// Comment being replied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl CommentBody {
    /// Encodes the body, adding the resource id field (`documentId`, ...).
    pub fn to_json(&self, resource: ResourceRef) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            fields.insert(
                resource.resource_type.id_field().to_owned(),
                Value::from(resource.resource_id),
            );
        }

        Ok(value)
    }
}

/// Which reaction to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReactionKind {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

/// Body of a like or dislike request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionBody {
    /// Biography of the reacting user.
    pub biografi_id: i64,
    /// Full name of the reacting user.
    pub user_name: String,
}
