mod user;
mod forms;
mod task;

pub use user::{User, UserProfile, PersonInfo, Passport, UserFilter, Page};
pub use forms::{AddUserForm, UpdateUserForm, TaskRequest, SummaryQuery, UserListQuery, PassportQuery};
pub use task::{Task, TaskInstance, minutes_between};
