use std::collections::HashMap;

use crate::domain::{
    TwoFactorSetting, TwoFactorStore, TwoFactorStoreError, UserId,
};

#[derive(Default)]
pub struct HashmapTwoFactorStore {
    settings: HashMap<UserId, TwoFactorSetting>,
}

#[async_trait::async_trait]
impl TwoFactorStore for HashmapTwoFactorStore {
    async fn get_setting(
        &self,
        user_id: &UserId,
    ) -> Result<TwoFactorSetting, TwoFactorStoreError> {
        match self.settings.get(user_id) {
            Some(setting) => Ok(setting.clone()),
            None => Err(TwoFactorStoreError::SettingNotFound),
        }
    }

    async fn upsert_setting(
        &mut self,
        setting: TwoFactorSetting,
    ) -> Result<(), TwoFactorStoreError> {
        self.settings.insert(setting.user_id, setting);
        Ok(())
    }
}
