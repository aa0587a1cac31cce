//! Passport directory served by the `user_info` binary.

use std::collections::HashMap;
use crate::models::{Passport, PersonInfo};

#[derive(Debug)]
pub struct PassportDirectory {
    entries: HashMap<i64, PersonInfo>,
}

impl PassportDirectory {
    /// Directory with the fixed records the service ships with.
    pub fn seeded() -> Self {
        let address = "Moscow, Lenina st. 5, apt. 1";
        let people = [
            (Passport::new(1234, 567890), "Vadimov", "Vadim", "Vadimovich"),
            (Passport::new(1111, 111111), "Sergeev", "Sergey", "Sergeevich"),
            (Passport::new(1234, 565432), "Ivanov", "Ivan", "Ivanovich"),
        ];

        let entries = people
            .into_iter()
            .map(|(passport, surname, name, patronymic)| {
                let info = PersonInfo {
                    surname: surname.to_string(),
                    name: name.to_string(),
                    patronymic: patronymic.to_string(),
                    address: address.to_string(),
                };
                (passport.combined_key(), info)
            })
            .collect();

        Self { entries }
    }

    pub fn lookup(&self, passport: Passport) -> Option<&PersonInfo> {
        self.entries.get(&passport.combined_key())
    }
}
