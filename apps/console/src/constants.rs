/// Languages an embed application may be translated into. Posted translation
/// maps are filtered against this table.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("eu", "Basque"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("nl", "Dutch"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

pub const EMBED_APP_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{name}}</title>
  {{#each languages}}
  <link rel="alternate" hreflang="{{code}}" href="{{url}}">
  {{/each}}
</head>
<body style="margin: 0">
  <iframe src="{{url}}" style="width: 100%; border: 0;{{#if scale}} transform: scale({{scale}}); transform-origin: 0 0;{{/if}}"{{#if height}} height="{{height}}"{{/if}}></iframe>
</body>
</html>
"#;

pub const EMBED_APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Module>
  <ModulePrefs title="{{name}}" author="{{author}}"{{#if description}} description="{{description}}"{{/if}}>
    {{#each languages}}
    <Locale lang="{{code}}"/>
    {{/each}}
  </ModulePrefs>
  {{#each languages}}
  <Content type="html" view="home" lang="{{code}}" href="{{url}}"/>
  {{/each}}
</Module>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_language_lookup() {
        assert!(is_supported_language("en"));
        assert!(is_supported_language("eu"));
        assert!(!is_supported_language("tlh"));
        assert!(!is_supported_language("EN"));
    }
}
