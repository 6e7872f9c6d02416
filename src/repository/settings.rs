use diesel::prelude::*;

use crate::domain::settings::Setting;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SettingsReader, SettingsWriter};

impl SettingsReader for DieselRepository {
    fn load_settings(&self) -> RepositoryResult<Vec<Setting>> {
        use crate::models::setting::Setting as DbSetting;
        use crate::schema::settings;

        let mut conn = self.conn()?;
        let rows = settings::table
            .order(settings::key.asc())
            .load::<DbSetting>(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl SettingsWriter for DieselRepository {
    fn save_settings(&self, values: &[Setting]) -> RepositoryResult<()> {
        use crate::models::setting::Setting as DbSetting;
        use crate::schema::settings;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            for setting in values {
                let row: DbSetting = setting.into();
                diesel::replace_into(settings::table)
                    .values(&row)
                    .execute(conn)?;
            }
            Ok(())
        })
    }
}
