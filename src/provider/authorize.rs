use crate::config::ProviderEndpoints;
use crate::error::{BrokerError, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};
use url::Url;

use super::registry::descriptor;

/// 构建跳转到提供商登录页的授权 URL。
///
/// 参数值统一百分号编码（空格为 `%20`）；授权地址自带查询串时以 `&` 续接。
pub fn build_authorize_url(endpoints: &ProviderEndpoints) -> Result<String> {
    let kind = endpoints.kind;
    crate::ensure_config!(
        !endpoints.authorization_uri.trim().is_empty(),
        "{} authorization_uri 未配置",
        kind
    );
    crate::ensure_config!(
        !endpoints.client_id.trim().is_empty(),
        "{} client_id 未配置",
        kind
    );
    crate::ensure_config!(
        !endpoints.redirect_uri.trim().is_empty(),
        "{} redirect_uri 未配置",
        kind
    );

    let base = endpoints.authorization_uri.trim();
    Url::parse(base).map_err(|e| {
        BrokerError::config_with_source(format!("Invalid authorize URL: {base}"), e)
    })?;

    let desc = descriptor(kind);
    let mut params: Vec<(&str, String)> = vec![
        ("client_id", endpoints.client_id.clone()),
        ("redirect_uri", endpoints.redirect_uri.clone()),
        ("response_type", "code".to_string()),
    ];
    if !desc.scopes.is_empty() {
        params.push(("scope", desc.scopes.join(" ")));
    }
    if let Some(state) = desc.fixed_state {
        params.push(("state", state.to_string()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    let url = format!("{base}{separator}{query}");

    ldebug!(
        "system",
        LogStage::Authorization,
        LogComponent::OAuth,
        "build_auth_url",
        &format!("🔗 [OAuth] 授权URL构建完成: provider={kind}"),
        params = params.len(),
    );

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;
    use crate::provider::types::ProviderKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn endpoints(kind: ProviderKind) -> ProviderEndpoints {
        let mut config = ProvidersConfig::default();
        let creds = config.credentials_mut(kind);
        creds.client_id = "client-123".to_string();
        creds.client_secret = Some("secret".to_string());
        creds.redirect_uri = format!("http://localhost:8080/oauth2/{kind}/callback");
        config.endpoints(kind)
    }

    fn count_param(url: &str, name: &str) -> usize {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .filter(|(key, _)| key == name)
            .count()
    }

    #[test]
    fn kakao_url_has_neither_scope_nor_state() {
        let url = build_authorize_url(&endpoints(ProviderKind::Kakao)).unwrap();
        assert_eq!(
            url,
            "https://kauth.kakao.com/oauth/authorize?client_id=client-123\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Foauth2%2Fkakao%2Fcallback\
             &response_type=code"
        );
    }

    #[test]
    fn naver_url_carries_fixed_state() {
        let url = build_authorize_url(&endpoints(ProviderKind::Naver)).unwrap();
        assert!(url.starts_with("https://nid.naver.com/oauth2.0/authorize?"));
        assert!(url.ends_with("&state=STATE"));
        assert_eq!(count_param(&url, "scope"), 0);
    }

    #[test]
    fn google_url_carries_encoded_scope() {
        let url = build_authorize_url(&endpoints(ProviderKind::Google)).unwrap();
        assert!(url.contains("&scope=openid%20profile%20email"));
        assert_eq!(count_param(&url, "state"), 0);
    }

    #[test]
    fn every_required_parameter_appears_once() {
        for kind in ProviderKind::ALL {
            let url = build_authorize_url(&endpoints(kind)).unwrap();
            for name in ["client_id", "redirect_uri", "response_type"] {
                assert_eq!(count_param(&url, name), 1, "{kind} {name}");
            }
        }
    }

    #[test]
    fn existing_query_string_is_extended() {
        let mut ep = endpoints(ProviderKind::Kakao);
        ep.authorization_uri = "https://auth.example.com/authorize?prompt=login".to_string();
        let url = build_authorize_url(&ep).unwrap();
        assert!(url.starts_with("https://auth.example.com/authorize?prompt=login&client_id="));
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn missing_configuration_is_reported() {
        let mut ep = endpoints(ProviderKind::Google);
        ep.client_id = String::new();
        let err = build_authorize_url(&ep).unwrap_err();
        assert!(matches!(err, BrokerError::Config { .. }));

        let mut ep = endpoints(ProviderKind::Naver);
        ep.redirect_uri = "  ".to_string();
        assert!(build_authorize_url(&ep).is_err());

        let mut ep = endpoints(ProviderKind::Kakao);
        ep.authorization_uri = "not a url".to_string();
        assert!(build_authorize_url(&ep).is_err());
    }

    proptest! {
        #[test]
        fn redirect_uri_survives_encoding(path in "[a-zA-Z0-9 &=?/#%+]{0,40}") {
            let mut ep = endpoints(ProviderKind::Google);
            ep.redirect_uri = format!("https://app.example.com/{path}x");
            let url = build_authorize_url(&ep).unwrap();

            let parsed = Url::parse(&url).unwrap();
            let values: Vec<String> = parsed
                .query_pairs()
                .filter(|(key, _)| key == "redirect_uri")
                .map(|(_, value)| value.into_owned())
                .collect();
            prop_assert_eq!(values, vec![ep.redirect_uri.clone()]);
        }
    }
}
