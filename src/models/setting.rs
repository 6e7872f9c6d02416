use diesel::prelude::*;

use crate::domain::settings::Setting as DomainSetting;

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::settings)]
/// Diesel model for a settings key-value row.
pub struct Setting {
    pub key: String,
    pub value: String,
}

impl From<Setting> for DomainSetting {
    fn from(setting: Setting) -> Self {
        Self {
            key: setting.key,
            value: setting.value,
        }
    }
}

impl From<&DomainSetting> for Setting {
    fn from(setting: &DomainSetting) -> Self {
        Self {
            key: setting.key.clone(),
            value: setting.value.clone(),
        }
    }
}
