use serde_json::{json, Value};

use super::calls::UserStoryInput;

pub fn format_user_story(user_type: &str, goal: &str, benefit: &str) -> String {
    format!("As a {}, I want {} so that {}.", user_type, goal, benefit)
}

pub fn create(input: &UserStoryInput) -> Value {
    let mut result = json!({
        "user_story": format_user_story(&input.user_type, &input.goal, &input.benefit),
        "format": "standard",
        "components": {
            "user_type": input.user_type,
            "goal": input.goal,
            "benefit": input.benefit,
        },
    });

    if let (Some(criteria), Some(object)) = (&input.acceptance_criteria, result.as_object_mut()) {
        object.insert("acceptance_criteria".to_string(), json!(criteria));
    }

    result
}
