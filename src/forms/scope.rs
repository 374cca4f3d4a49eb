use serde::Deserialize;
use validator::Validate;

use crate::domain::types::ClientId;
use crate::forms::{FormError, non_blank};
use crate::query::ScopeFilter;

/// Posted by the tenant picker in the navigation bar.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectScopeForm {
    #[validate(range(min = 1))]
    pub client_id: i64,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub client_name: Option<String>,
}

impl TryFrom<SelectScopeForm> for ScopeFilter {
    type Error = FormError;

    fn try_from(form: SelectScopeForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let client_id = ClientId::new(form.client_id).map_err(|_| FormError::InvalidClientId)?;
        let label = non_blank(form.client_name.as_deref()).map(ToString::to_string);

        Ok(ScopeFilter::client(client_id.get(), label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_scope() {
        let form = SelectScopeForm {
            client_id: 7,
            client_name: Some(" Rifas Sur ".into()),
        };
        let scope = ScopeFilter::try_from(form).unwrap();
        assert_eq!(scope, ScopeFilter::client(7, Some("Rifas Sur".into())));
    }

    #[test]
    fn rejects_non_positive_client() {
        let form = SelectScopeForm {
            client_id: 0,
            client_name: None,
        };
        assert!(ScopeFilter::try_from(form).is_err());
    }
}
