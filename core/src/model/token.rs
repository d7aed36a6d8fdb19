use serde::{Deserialize, Serialize};

/// Credentials issued by `login/token.php`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    token: String,
    #[serde(default)]
    privatetoken: Option<String>,
}

getters!(Token {
    borrow token: String,
    borrow privatetoken: Option<String>,
});
