//! Generated request scripts.
//!
//! The generated text is consumed by existing collections and must not
//! change.

/// A test script that stores a value from the JSON response in an
/// environment variable.
///
/// The value is the response's `token`, `access_token` or `id` field,
/// whichever is set first, or else the whole response as a JSON string.
#[must_use]
pub fn save_variable_script(variable: &str) -> Vec<String> {
    vec![
        "// Save response data to variable".to_string(),
        "const responseJson = pm.response.json();".to_string(),
        format!(
            "pm.environment.set('{variable}', responseJson.token || responseJson.access_token || responseJson.id || JSON.stringify(responseJson));"
        ),
    ]
}

/// A pre-request script that aborts the request when any of the given
/// environment variables is unset.
#[must_use]
pub fn prerequest_script<'a>(variables: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut lines = vec!["// Check required variables".to_string()];

    for variable in variables {
        lines.push(format!("if (!pm.environment.get('{variable}')) {{"));
        lines.push(format!(
            "    throw new Error('Required variable {variable} is not set');"
        ));
        lines.push("}".to_string());
    }

    lines
}
