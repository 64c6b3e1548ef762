use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub display_name: String,
    pub email: String,
}
