//! HTML rendering for the profile page and its live fragments.

use crate::application::use_cases::load_account::LoadAccountEvent;
use crate::application::use_cases::search_account::SearchEvent;
use crate::domain::models::account::Account;
use crate::domain::models::extras::Extras;
use crate::domain::models::pulse::Pulse;
use crate::domain::models::repository::Repository;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CLIENT_SCRIPT: &str = r##"
(() => {
  const profileEl = document.getElementById("profile");
  const reposEl = document.getElementById("repos");
  const searchBar = document.getElementById("searchInput");
  const searchBtn = document.getElementById("searchBtn");
  const neutral = { buttonColor: "#007bff", fieldValue: "", textColor: "black" };

  function paint(state) {
    searchBtn.style.backgroundColor = state.buttonColor;
    searchBar.value = state.fieldValue;
    searchBar.style.color = state.textColor;
  }

  let initialReset = null;
  const initialDelay = Number(searchBtn.dataset.pulseResetMs || 0);
  if (initialDelay > 0) {
    initialReset = setTimeout(() => paint(neutral), initialDelay);
  }

  const scheme = location.protocol === "https:" ? "wss:" : "ws:";
  const socket = new WebSocket(`${scheme}//${location.host}/ws`);

  // The server-rendered page stops before extras; the session streams them.
  socket.addEventListener("open", () => {
    const identifier = profileEl.dataset.identifier;
    if (identifier) {
      socket.send(JSON.stringify({ type: "load", identifier }));
    }
  });

  socket.addEventListener("message", (event) => {
    const message = JSON.parse(event.data);
    switch (message.type) {
      case "profile":
        profileEl.innerHTML = message.html;
        break;
      case "repositories_cleared":
        reposEl.innerHTML = "";
        break;
      case "repository":
        reposEl.insertAdjacentHTML("beforeend", message.html);
        break;
      case "extras": {
        const container = reposEl.querySelector(`.extra[data-repo-index="${message.index}"]`);
        if (container) container.insertAdjacentHTML("beforeend", message.html);
        break;
      }
      case "pulse":
        clearTimeout(initialReset);
        paint(message);
        break;
      case "pulse_reset":
        paint(neutral);
        break;
    }
  });

  searchBtn.addEventListener("click", () => {
    socket.send(JSON.stringify({ type: "search", query: searchBar.value }));
  });
})();
"##;

const CONFIRM_UNLOAD_SCRIPT: &str = r"
window.addEventListener('beforeunload', (event) => {
  event.preventDefault();
  event.returnValue = '';
});
";

const STYLE: &str = r"
body { font-family: system-ui, -apple-system, sans-serif; max-width: 960px; margin: 0 auto; padding: 2rem; }
.search { display: flex; gap: 0.5rem; margin-bottom: 1.5rem; }
.search input { flex: 1; padding: 0.5rem; color: black; }
.search button { padding: 0.5rem 1rem; border: none; color: white; background-color: #007bff; cursor: pointer; }
.repo { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
.extra { margin-top: 8px; }
";

#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub confirm_unload: bool,
}

/// Server-side model of the page regions, built by applying events in order.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub profile: Option<Account>,
    pub repositories: Vec<RepositoryView>,
    pub pulse: Option<Pulse>,
}

#[derive(Debug, Clone)]
pub struct RepositoryView {
    pub repository: Repository,
    pub extras: Vec<Extras>,
}

impl PageView {
    pub fn apply(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Pulse(pulse) => self.pulse = Some(pulse),
            SearchEvent::Load(LoadAccountEvent::Profile(account)) => self.profile = Some(account),
            SearchEvent::Load(LoadAccountEvent::RepositoriesCleared) => self.repositories.clear(),
            SearchEvent::Load(LoadAccountEvent::Repository { repository, .. }) => {
                self.repositories.push(RepositoryView {
                    repository,
                    extras: Vec::new(),
                });
            }
            SearchEvent::Load(LoadAccountEvent::RepositoriesListed { .. }) => {}
            SearchEvent::Load(LoadAccountEvent::Extras { index, extras }) => {
                if let Some(view) = self.repositories.get_mut(index) {
                    view.extras.push(extras);
                }
            }
        }
    }
}

pub fn page(view: &PageView, options: PageOptions) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "GitHub Profile" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (search_control(view.pulse.as_ref()))
                div id="profile"
                    data-identifier=[view.profile.as_ref().map(|account| &account.login)] {
                    @if let Some(account) = &view.profile {
                        (profile_fragment(account))
                    }
                }
                div id="repos" {
                    @for (index, item) in view.repositories.iter().enumerate() {
                        (repository_with_extras(index, item))
                    }
                }
                script { (PreEscaped(CLIENT_SCRIPT)) }
                @if options.confirm_unload {
                    script { (PreEscaped(CONFIRM_UNLOAD_SCRIPT)) }
                }
            }
        }
    }
}

fn search_control(pulse: Option<&Pulse>) -> Markup {
    html! {
        div.search {
            @if let Some(pulse) = pulse {
                input id="searchInput" type="text" placeholder="GitHub username"
                    value=(pulse.field_value) style=(format!("color: {}", pulse.text_color));
                button id="searchBtn" type="button"
                    style=(format!("background-color: {}", pulse.button_color))
                    data-pulse-reset-ms=(pulse.delay.as_millis().to_string()) { "Search" }
            } @else {
                input id="searchInput" type="text" placeholder="GitHub username";
                button id="searchBtn" type="button" { "Search" }
            }
        }
    }
}

pub fn profile_fragment(account: &Account) -> Markup {
    html! {
        h2 { (account.display_name()) }
        p { (account.bio().unwrap_or("No bio")) }
        p { "Repos: " (account.public_repos) " | Followers: " (account.followers) }
        a href=(account.html_url) target="_blank" { "View Profile" }
    }
}

pub fn repository_fragment(index: usize, repository: &Repository) -> Markup {
    repository_card(index, repository, &[])
}

fn repository_with_extras(index: usize, item: &RepositoryView) -> Markup {
    repository_card(index, &item.repository, &item.extras)
}

fn repository_card(index: usize, repository: &Repository, extras: &[Extras]) -> Markup {
    let updated_on = repository
        .updated_on()
        .unwrap_or_else(|| "Unknown".to_string());
    html! {
        div.repo {
            h3 { (repository.name.as_deref().unwrap_or("Unnamed repository")) }
            p { (repository.description.as_deref().unwrap_or("No description")) }
            small {
                "⭐ " (repository.stargazers_count)
                " · 🍴 " (repository.forks_count)
                " · " (repository.language.as_deref().unwrap_or("N/A"))
            }
            br;
            small { "Updated: " (updated_on) }
            div style="margin-top:8px" {
                a href=(repository.html_url) target="_blank" { "📦 Repo" }
                @if let Some(live_url) = repository.live_url() {
                    " "
                    a.live href=(live_url) target="_blank" { "🌐 Live Page" }
                }
            }
            div.extra data-repo-index=(index) {
                @for item in extras {
                    (extras_fragment(item))
                }
            }
        }
    }
}

/// Lines for the fields that resolved. Renders nothing for empty extras.
pub fn extras_fragment(extras: &Extras) -> Markup {
    html! {
        @if let Some(message) = &extras.last_commit {
            small { "Last commit: " (message) }
            br;
        }
        @if let Some(tag) = &extras.latest_release {
            small { "Latest release: " (tag) }
            br;
        }
        @if let Some(count) = extras.open_issues {
            small { "Open issues: " (count) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::pulse::{PulseDelays, PulseKind};

    fn account() -> Account {
        Account {
            login: "octocat".to_string(),
            name: None,
            bio: None,
            public_repos: 8,
            followers: 20,
            html_url: "https://github.com/octocat".to_string(),
        }
    }

    fn repository(name: &str, homepage: Option<&str>) -> Repository {
        Repository {
            name: Some(name.to_string()),
            description: Some("<b>bold</b> claims".to_string()),
            stargazers_count: 7,
            forks_count: 2,
            language: None,
            updated_at: None,
            homepage: homepage.map(str::to_string),
            html_url: format!("https://github.com/octocat/{name}"),
            commits_url: String::new(),
            releases_url: String::new(),
            url: String::new(),
        }
    }

    #[test]
    fn test_profile_uses_fallbacks() {
        let html = profile_fragment(&account()).into_string();
        assert!(html.contains("<h2>octocat</h2>"));
        assert!(html.contains("<p>No bio</p>"));
        assert!(html.contains("Repos: 8 | Followers: 20"));
    }

    #[test]
    fn test_profile_prefers_display_name() {
        let mut account = account();
        account.name = Some("The Octocat".to_string());
        account.bio = Some("Mascot".to_string());
        let html = profile_fragment(&account).into_string();
        assert!(html.contains("<h2>The Octocat</h2>"));
        assert!(html.contains("<p>Mascot</p>"));
    }

    #[test]
    fn test_live_link_only_for_http_homepage() {
        let without = repository_fragment(0, &repository("a", None)).into_string();
        let relative = repository_fragment(0, &repository("a", Some("example.com"))).into_string();
        let with = repository_fragment(0, &repository("a", Some("https://example.com"))).into_string();

        assert!(!without.contains("Live Page"));
        assert!(!relative.contains("Live Page"));
        assert!(with.contains(r#"href="https://example.com""#));
        assert!(with.contains("Live Page"));
    }

    #[test]
    fn test_repository_placeholders_and_escaping() {
        let html = repository_fragment(3, &repository("demo", None)).into_string();
        assert!(html.contains("N/A"));
        assert!(html.contains("Updated: Unknown"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; claims"));
        assert!(html.contains(r#"data-repo-index="3""#));
    }

    #[test]
    fn test_extras_without_release_has_no_release_line() {
        let extras = Extras {
            last_commit: Some("init…".to_string()),
            latest_release: None,
            open_issues: Some(0),
        };
        let html = extras_fragment(&extras).into_string();
        assert!(html.contains("Last commit: init…"));
        assert!(!html.contains("Latest release"));
        assert!(html.contains("Open issues: 0"));
        assert!(extras_fragment(&Extras::default()).into_string().is_empty());
    }

    #[test]
    fn test_page_view_appends_in_order() {
        let mut view = PageView::default();
        view.apply(SearchEvent::Load(LoadAccountEvent::Profile(account())));
        view.apply(SearchEvent::Load(LoadAccountEvent::RepositoriesCleared));
        for (index, name) in ["first", "second", "third"].into_iter().enumerate() {
            view.apply(SearchEvent::Load(LoadAccountEvent::Repository {
                index,
                repository: repository(name, None),
            }));
        }
        view.apply(SearchEvent::Load(LoadAccountEvent::Extras {
            index: 1,
            extras: Extras {
                latest_release: Some("v9".to_string()),
                ..Extras::default()
            },
        }));

        let html = page(&view, PageOptions::default()).into_string();
        let first = html.find("<h3>first</h3>");
        let second = html.find("<h3>second</h3>");
        let third = html.find("<h3>third</h3>");
        assert!(first < second && second < third && first.is_some());
        assert_eq!(html.matches(r#"class="repo""#).count(), 3);
        assert!(html.contains("Latest release: v9"));
        assert!(!html.contains("beforeunload"));
    }

    #[test]
    fn test_page_names_rendered_account() {
        let empty = page(&PageView::default(), PageOptions::default()).into_string();
        assert!(!empty.contains("data-identifier"));

        let mut view = PageView::default();
        view.apply(SearchEvent::Load(LoadAccountEvent::Profile(account())));
        view.apply(SearchEvent::Load(LoadAccountEvent::RepositoriesListed { count: 0 }));
        let html = page(&view, PageOptions::default()).into_string();
        assert!(html.contains(r#"data-identifier="octocat""#));
        assert!(html.contains(r##"buttonColor: "#007bff""##));
        assert!(html.contains(r#"type: "load""#));
    }

    #[test]
    fn test_page_carries_pulse_state() {
        let view = PageView {
            pulse: Some(Pulse::new(PulseKind::Found, PulseDelays::default())),
            ..PageView::default()
        };
        let html = page(&view, PageOptions { confirm_unload: true }).into_string();
        assert!(html.contains(r#"value="User found""#));
        assert!(html.contains("background-color: green"));
        assert!(html.contains(r#"data-pulse-reset-ms="1000""#));
        assert!(html.contains("beforeunload"));
    }
}
