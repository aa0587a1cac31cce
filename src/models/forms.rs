use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    #[serde(rename = "passportNumber")]
    pub passport_number: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpdateUserForm {
    pub passport_serie: i32,
    pub passport_number: i32,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patronymic: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct TaskRequest {
    pub user_id: i32,
    pub id_task: i32,
}

// Query strings are kept raw so the handlers can report which parameter is bad
#[derive(Debug, Deserialize, Default)]
pub struct SummaryQuery {
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UserListQuery {
    pub passport_serie: Option<String>,
    pub passport_number: Option<String>,
    pub surname: Option<String>,
    pub name: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PassportQuery {
    #[serde(rename = "passportSerie")]
    pub passport_serie: Option<String>,
    #[serde(rename = "passportNumber")]
    pub passport_number: Option<String>,
}
