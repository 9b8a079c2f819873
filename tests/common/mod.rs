use serde_json::{Value, json};

pub fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 583231,
        "name": null,
        "bio": null,
        "public_repos": 2,
        "followers": 7,
        "html_url": format!("https://github.com/{login}")
    })
}

/// A `/users/{id}/repos` item whose API links point back at `base`.
pub fn repository_json(base: &str, owner: &str, name: &str) -> Value {
    let api = format!("{base}/repos/{owner}/{name}");
    json!({
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "description": null,
        "stargazers_count": 80,
        "forks_count": 9,
        "language": null,
        "updated_at": "2024-03-05T10:00:00Z",
        "homepage": null,
        "html_url": format!("https://github.com/{owner}/{name}"),
        "commits_url": format!("{api}/commits{{/sha}}"),
        "releases_url": format!("{api}/releases{{/id}}"),
        "url": api
    })
}
