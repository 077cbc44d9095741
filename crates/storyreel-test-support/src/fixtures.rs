//! Profile document fixtures.

use serde_json::{Value, json};

/// A profile record in the dataset's JSON shape with the given story ids.
#[must_use]
pub fn owner_json(id: &str, story_ids: &[&str]) -> Value {
    let stories: Vec<Value> = story_ids
        .iter()
        .map(|story_id| {
            json!({
                "id": story_id,
                "image": format!("https://img.example/{id}/{story_id}.jpg"),
                "timestamp": "2h",
            })
        })
        .collect();

    json!({
        "id": id,
        "username": format!("user_{id}"),
        "avatar": format!("https://img.example/{id}/avatar.jpg"),
        "isVerified": false,
        "isYourStory": false,
        "stories": stories,
    })
}

/// A profile document built from `(owner id, story ids)` pairs.
#[must_use]
pub fn profile_document(owners: &[(&str, &[&str])]) -> Value {
    Value::Array(
        owners
            .iter()
            .map(|(id, story_ids)| owner_json(id, story_ids))
            .collect(),
    )
}
