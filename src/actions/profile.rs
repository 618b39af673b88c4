//! Editing the signed-in member's own profile
//!
//! Profile forms are filled the way a person would: type into the field,
//! pick the first autocomplete suggestion, choose month/year from the date
//! selects, then press Save.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::{isolate, truncate_chars, ActionResult, Actions, Status};
use crate::browser::dom::{self, ButtonMatch};
use crate::error::Result;
use crate::scraping::urls::BASE;

const CREDENTIAL_ID_LIMIT: usize = 80;
const PROJECT_DESCRIPTION_LIMIT: usize = 2000;
const ABOUT_PREVIEW: usize = 200;

const MY_PROFILE: &str = r#"() => {
    const text = el => (el && el.innerText ? el.innerText.trim() : '');
    const sectionOf = id => {
        const anchor = document.getElementById(id);
        return anchor ? anchor.closest('section') : null;
    };
    const headed = title => Array.from(document.querySelectorAll('section'))
        .find(s => text(s.querySelector('h2')).toLowerCase().includes(title));
    const data = {
        name: text(document.querySelector('h1')),
        headline: text(document.querySelector('.text-body-medium.break-words')),
        location: text(document.querySelector('.text-body-small.inline.t-black--light.break-words')),
        about: '',
        profile_url: window.location.href,
        profile_languages: [],
        experiences: [],
        education: [],
        skills: [],
        languages: [],
        connection_count: '',
        follower_count: ''
    };
    const about = sectionOf('about');
    if (about) {
        data.about = text(about.querySelector('.inline-show-more-text span[aria-hidden="true"], .inline-show-more-text'));
    }
    const profileLang = headed('profile language');
    if (profileLang) {
        for (const radio of profileLang.querySelectorAll('input[type="radio"]')) {
            const label = radio.closest('label') || radio.parentElement;
            if (label) data.profile_languages.push(text(label));
        }
    }
    for (const el of document.querySelectorAll('a[href*="connections"] span, li.text-body-small')) {
        const t = text(el);
        if (!data.connection_count && t.includes('connection')) data.connection_count = t;
        if (!data.follower_count && t.includes('follower')) data.follower_count = t;
    }
    const entities = section => section
        ? Array.from(section.querySelectorAll('[data-view-name="profile-component-entity"]'))
        : [];
    for (const item of entities(sectionOf('experience'))) {
        const title = text(item.querySelector('.t-bold span'));
        if (title) data.experiences.push({
            title,
            company: text(item.querySelector('.t-normal span')),
            duration: text(item.querySelector('.t-black--light span'))
        });
    }
    for (const item of entities(sectionOf('education'))) {
        const school = text(item.querySelector('.t-bold span'));
        if (school) data.education.push({
            school,
            degree: text(item.querySelector('.t-normal span')),
            years: text(item.querySelector('.t-black--light span'))
        });
    }
    const skills = sectionOf('skills');
    if (skills) {
        for (const item of skills.querySelectorAll('.t-bold span')) {
            const skill = text(item);
            if (skill && !skill.includes('Show all')) data.skills.push(skill);
        }
    }
    const langs = headed('languages');
    if (langs) {
        for (const item of langs.querySelectorAll('.t-bold')) {
            const language = text(item);
            if (language && language !== 'Languages') {
                data.languages.push({ language, proficiency: text(item.nextElementSibling) });
            }
        }
    }
    return data;
}"#;

const PICK_PROFILE_LANGUAGE: &str = r#"(label) => {
    for (const section of document.querySelectorAll('section')) {
        const heading = section.querySelector('h2');
        if (!heading || !heading.innerText.toLowerCase().includes('profile language')) continue;
        for (const radio of section.querySelectorAll('input[type="radio"]')) {
            const l = radio.closest('label') || document.querySelector(`label[for="${radio.id}"]`);
            if (l && l.innerText.includes(label)) {
                radio.click();
                return true;
            }
        }
    }
    return false;
}"#;

/// Set the value of a contenteditable or textarea next to a label
const FILL_LABELLED_EDITOR: &str = r#"({ label, value }) => {
    for (const el of document.querySelectorAll('label, span')) {
        if (!el.innerText.toLowerCase().includes(label)) continue;
        const parent = el.closest('.artdeco-text-input--container, div');
        const input = parent ? parent.querySelector('[role="textbox"], textarea, .ql-editor') : null;
        if (!input) continue;
        if (input.isContentEditable) {
            input.innerText = value;
        } else {
            input.value = value;
        }
        input.dispatchEvent(new Event('input', { bubbles: true }));
        return true;
    }
    return false;
}"#;

/// Pick an option in any select whose text contains the value
const PICK_ANY_SELECT: &str = r#"(value) => {
    const wanted = value.toLowerCase();
    for (const select of document.querySelectorAll('select')) {
        for (const opt of select.options) {
            if (opt.innerText.toLowerCase().includes(wanted)) {
                select.value = opt.value;
                select.dispatchEvent(new Event('change', { bubbles: true }));
                return true;
            }
        }
    }
    return false;
}"#;

/// Set year and month selects whose label mentions one of `keys`
const SET_DATE: &str = r#"({ keys, year, month }) => {
    let touched = false;
    const pick = (select, match) => {
        for (const opt of select.options) {
            if (match(opt)) {
                select.value = opt.value;
                select.dispatchEvent(new Event('change', { bubbles: true }));
                touched = true;
                return;
            }
        }
    };
    for (const select of document.querySelectorAll('select')) {
        const container = select.closest('.artdeco-text-input--container') || select.parentElement;
        const label = (container && container.querySelector('label')) ||
            document.querySelector(`label[for="${select.id}"]`) ||
            select.previousElementSibling;
        const labelText = ((label && label.innerText) || select.getAttribute('aria-label') || '').toLowerCase();
        if (!keys.some(k => labelText.includes(k))) continue;
        if (labelText.includes('month')) {
            if (month) pick(select, o => o.innerText.toLowerCase().includes(month.toLowerCase()));
        } else if (year && (labelText.includes('year') || select.querySelector('option[value*="20"]'))) {
            pick(select, o => o.value === year || o.innerText.trim() === year);
        }
    }
    return touched;
}"#;

const TICK_CHECKBOX: &str = r#"(needles) => {
    for (const cb of document.querySelectorAll('input[type="checkbox"]')) {
        const label = cb.closest('label') || document.querySelector(`label[for="${cb.id}"]`);
        const text = ((label && label.innerText) || '').toLowerCase();
        if (needles.some(n => text.includes(n))) {
            if (!cb.checked) cb.click();
            return true;
        }
    }
    return false;
}"#;

/// Focus the last element matching any selector
const FOCUS_LAST: &str = r#"(selectors) => {
    const all = document.querySelectorAll(selectors.join(', '));
    if (all.length === 0) return false;
    const el = all[all.length - 1];
    el.scrollIntoView({ block: 'center' });
    el.click();
    el.focus();
    return true;
}"#;

const SELECT_PROFICIENCY: &str = r#"(proficiency) => {
    const prof = proficiency.toLowerCase();
    for (const select of document.querySelectorAll('select')) {
        const label = document.querySelector(`label[for="${select.id}"]`);
        const labelText = ((label && label.innerText) || select.getAttribute('aria-label') || '').toLowerCase();
        if (!labelText.includes('proficiency') && !labelText.includes('level')) continue;
        for (const opt of select.options) {
            const optText = opt.innerText.toLowerCase();
            if (optText && (optText.includes(prof) || prof.includes(optText.split(' ')[0]))) {
                select.value = opt.value;
                select.dispatchEvent(new Event('change', { bubbles: true }));
                return true;
            }
        }
    }
    return false;
}"#;

const CLICK_ADD_ENTRY: &str = r#"(needles) => {
    for (const btn of document.querySelectorAll('button')) {
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.toLowerCase();
        if (needles.some(n => aria.includes(n) || text.includes(n))) {
            btn.click();
            return true;
        }
    }
    const fab = document.querySelector('[data-view-name="profile-add-position"] button');
    if (fab) { fab.click(); return true; }
    return false;
}"#;

/// `en` or `pt`; anything else is treated as `en`
fn language_label(language: &str) -> &'static str {
    if language == "pt" {
        "Português"
    } else {
        "English"
    }
}

/// Optional intro fields. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntroUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub headline: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub pronouns: Option<String>,
}

impl IntroUpdate {
    pub fn is_empty(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.headline,
            &self.industry,
            &self.city,
            &self.country,
            &self.pronouns,
        ]
        .iter()
        .all(|f| f.as_deref().map_or(true, str::is_empty))
    }
}

/// Month is a name (`January`), year four digits
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start_month: Option<String>,
    pub start_year: Option<String>,
    pub end_month: Option<String>,
    pub end_year: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub dates: DateRange,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuing_organization: String,
    pub issue_month: Option<String>,
    pub issue_year: Option<String>,
    pub expiration_month: Option<String>,
    pub expiration_year: Option<String>,
    pub has_expiration: bool,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}

impl Default for CertificationEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            issuing_organization: String::new(),
            issue_month: None,
            issue_year: None,
            expiration_month: None,
            expiration_year: None,
            has_expiration: true,
            credential_id: None,
            credential_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: Option<String>,
    pub project_url: Option<String>,
    #[serde(flatten)]
    pub dates: DateRange,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Short preview of the about text
pub fn about_preview(text: &str) -> String {
    if text.chars().count() > ABOUT_PREVIEW {
        format!("{}...", truncate_chars(text, ABOUT_PREVIEW))
    } else {
        text.to_string()
    }
}

impl Actions {
    /// Structured view of my own profile
    pub async fn get_my_profile(&self, language: &str) -> Result<ActionResult> {
        isolate(self.my_profile_inner(language).await, "getting profile")
    }

    async fn my_profile_inner(&self, language: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/", BASE)).await?;
        self.settle(2.0).await;

        if language == "pt" && self.pick_profile_language(language).await? {
            self.settle(2.0).await;
        }

        let profile = self.run(MY_PROFILE).await?;
        Ok(ActionResult::success("Profile retrieved")
            .with("profile", profile)
            .with("language", language))
    }

    pub async fn update_profile_intro(&self, update: &IntroUpdate, profile_language: &str) -> Result<ActionResult> {
        isolate(
            self.intro_inner(update, profile_language).await,
            "updating profile intro",
        )
    }

    async fn intro_inner(&self, update: &IntroUpdate, profile_language: &str) -> Result<ActionResult> {
        if update.is_empty() {
            return Ok(ActionResult::new(Status::Warning, "No fields were provided to update"));
        }

        self.open(&format!("{}/in/me/edit/intro/", BASE)).await?;
        self.settle(2.0).await;
        self.switch_form_language(profile_language).await?;

        let mut updates = Vec::new();
        if let Some(first) = present(&update.first_name) {
            if self.fill_first(&["input[id*=\"firstName\"]", "input[name*=\"firstName\"]"], first).await? {
                updates.push(format!("first_name: {}", first));
            }
        }
        if let Some(last) = present(&update.last_name) {
            if self.fill_first(&["input[id*=\"lastName\"]", "input[name*=\"lastName\"]"], last).await? {
                updates.push(format!("last_name: {}", last));
            }
        }
        if let Some(headline) = present(&update.headline) {
            let set = self
                .call(FILL_LABELLED_EDITOR, json!({ "label": "headline", "value": headline }))
                .await?;
            if set.as_bool().unwrap_or(false) {
                updates.push(format!("headline: {}...", truncate_chars(headline, 50)));
            }
        }
        let lookups = [
            ("industry", &update.industry, ["input[id*=\"industry\"]", "input[aria-label*=\"Industry\"]"]),
            ("city", &update.city, ["input[id*=\"city\"]", "input[aria-label*=\"City\"]"]),
            ("country", &update.country, ["input[id*=\"country\"]", "input[aria-label*=\"Country\"]"]),
        ];
        for (field, value, selectors) in lookups {
            if let Some(value) = present(value) {
                if self.autocomplete(&selectors, value).await? {
                    updates.push(format!("{}: {}", field, value));
                }
            }
        }
        if let Some(pronouns) = present(&update.pronouns) {
            if self.call(PICK_ANY_SELECT, json!(pronouns)).await?.as_bool().unwrap_or(false) {
                updates.push(format!("pronouns: {}", pronouns));
            }
        }

        if updates.is_empty() {
            return Ok(ActionResult::new(
                Status::Warning,
                "None of the provided fields were found on the intro form",
            ));
        }
        self.save_form().await?;

        Ok(ActionResult::success("Profile intro updated successfully")
            .with("updates", updates)
            .with("profile_language", profile_language))
    }

    pub async fn update_profile_about(&self, about: &str, profile_language: &str) -> Result<ActionResult> {
        isolate(
            self.about_inner(about, profile_language).await,
            "updating about section",
        )
    }

    async fn about_inner(&self, about: &str, profile_language: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/", BASE)).await?;
        self.settle(2.0).await;

        let edit = ButtonMatch {
            scope: None,
            exact: false,
            aria: true,
        };
        if dom::click_button(self.page(), &["edit about"], edit).await?.is_none() {
            return Ok(ActionResult::error("Could not find Edit About button"));
        }
        self.settle(2.0).await;
        self.switch_form_language(profile_language).await?;

        let editor = self
            .first_existing(&["[role=\"textbox\"]", "textarea", ".ql-editor"])
            .await?;
        let Some(editor) = editor else {
            return Ok(ActionResult::error("About editor not found"));
        };
        self.page().fill(editor, about).await?;
        self.settle(1.0).await;
        self.save_form().await?;

        Ok(ActionResult::success("About section updated successfully")
            .with("about_preview", about_preview(about))
            .with("profile_language", profile_language))
    }

    pub async fn add_experience(&self, entry: &ExperienceEntry, profile_language: &str) -> Result<ActionResult> {
        isolate(
            self.experience_inner(entry, profile_language).await,
            "adding experience",
        )
    }

    async fn experience_inner(&self, entry: &ExperienceEntry, profile_language: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/details/experience/", BASE)).await?;
        self.settle(2.0).await;

        let opened = self
            .call(CLICK_ADD_ENTRY, json!(["add experience", "add position"]))
            .await?
            .as_bool()
            .unwrap_or(false);
        if !opened {
            debug!("No add-experience button, opening the overlay directly");
            self.page()
                .goto(&format!("{}/in/me/overlay/add-experience/", BASE))
                .await?;
        }
        self.settle(2.0).await;
        self.switch_form_language(profile_language).await?;

        if self.fill_first(&["input[id*=\"title\"]", "input[aria-label*=\"Title\"]"], &entry.title).await? {
            self.settle(0.3).await;
        }
        self.autocomplete(&["input[id*=\"company\"]", "input[aria-label*=\"Company\"]"], &entry.company)
            .await?;
        if let Some(location) = present(&entry.location) {
            self.autocomplete(&["input[id*=\"location\"]", "input[aria-label*=\"Location\"]"], location)
                .await?;
        }
        if let Some(kind) = present(&entry.employment_type) {
            dom::select_by_label(self.page(), &["employment", "type"], kind).await?;
        }
        self.apply_dates(&entry.dates).await?;
        if let Some(description) = present(&entry.description) {
            self.type_into_last(&["[role=\"textbox\"]", "textarea"], description)
                .await?;
        }

        self.settle(1.0).await;
        self.save_form().await?;
        Ok(ActionResult::success(format!(
            "Experience added successfully: {} at {}",
            entry.title, entry.company
        ))
        .with("profile_language", profile_language))
    }

    pub async fn add_education(&self, entry: &EducationEntry, profile_language: &str) -> Result<ActionResult> {
        isolate(
            self.education_inner(entry, profile_language).await,
            "adding education",
        )
    }

    async fn education_inner(&self, entry: &EducationEntry, profile_language: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/overlay/add-education/", BASE)).await?;
        self.settle(2.0).await;
        self.switch_form_language(profile_language).await?;

        self.autocomplete(&["input[id*=\"school\"]", "input[aria-label*=\"School\"]"], &entry.school)
            .await?;
        if let Some(degree) = present(&entry.degree) {
            self.fill_first(&["input[id*=\"degree\"]", "input[aria-label*=\"Degree\"]"], degree)
                .await?;
            self.settle(0.3).await;
        }
        if let Some(field) = present(&entry.field_of_study) {
            self.fill_first(&["input[id*=\"field\"]", "input[aria-label*=\"Field\"]"], field)
                .await?;
            self.settle(0.3).await;
        }
        self.set_date(&["start"], present(&entry.start_year), None).await?;
        self.set_date(&["end"], present(&entry.end_year), None).await?;
        if let Some(description) = present(&entry.description) {
            self.type_into_last(&["[role=\"textbox\"]", "textarea"], description)
                .await?;
        }

        self.settle(1.0).await;
        self.save_form().await?;
        Ok(ActionResult::success(format!("Education added successfully: {}", entry.school))
            .with("profile_language", profile_language))
    }

    pub async fn add_skill(&self, skill: &str) -> Result<ActionResult> {
        isolate(self.skill_inner(skill).await, "adding skill")
    }

    async fn skill_inner(&self, skill: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/details/skills/", BASE)).await?;
        self.settle(2.0).await;

        let opened = self
            .call(CLICK_ADD_ENTRY, json!(["add skill", "add a skill"]))
            .await?
            .as_bool()
            .unwrap_or(false);
        if !opened {
            self.page()
                .goto(&format!("{}/in/me/overlay/add-skill/", BASE))
                .await?;
        }
        self.settle(2.0).await;

        if !self
            .autocomplete(&["input[id*=\"skill\"]", "input[aria-label*=\"Skill\"]"], skill)
            .await?
        {
            return Ok(ActionResult::error("Skill input not found"));
        }
        self.settle(1.0).await;

        let save = ButtonMatch::default();
        if dom::click_button(self.page(), &["save", "add"], save).await?.is_some() {
            self.settle(2.0).await;
        }
        Ok(ActionResult::success(format!("Skill added successfully: {}", skill)))
    }

    pub async fn switch_profile_language(&self, language: &str) -> Result<ActionResult> {
        isolate(
            self.switch_language_inner(language).await,
            "switching profile language",
        )
    }

    async fn switch_language_inner(&self, language: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/", BASE)).await?;
        self.settle(2.0).await;

        let label = language_label(language);
        if self.pick_profile_language(language).await? {
            self.settle(2.0).await;
            Ok(ActionResult::success(format!("Profile language switched to {}", label))
                .with("language", language))
        } else {
            Ok(ActionResult::error(format!(
                "Could not find {} profile language option. Make sure you have a profile in that language.",
                label
            )))
        }
    }

    pub async fn add_certification(&self, entry: &CertificationEntry) -> Result<ActionResult> {
        isolate(self.certification_inner(entry).await, "adding certification")
    }

    async fn certification_inner(&self, entry: &CertificationEntry) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/edit/forms/certification/new/", BASE))
            .await?;
        self.settle(2.0).await;

        self.fill_first(&["input[id*=\"name\"]", "input[aria-label*=\"Name\"]"], &entry.name)
            .await?;
        self.settle(0.3).await;
        self.autocomplete(
            &["input[id*=\"issuing\"]", "input[aria-label*=\"Issuing organization\"]"],
            &entry.issuing_organization,
        )
        .await?;

        if !entry.has_expiration {
            self.call(TICK_CHECKBOX, json!(["expire", "expiration"])).await?;
            self.settle(0.3).await;
        }
        self.set_date(&["issue", "start"], present(&entry.issue_year), present(&entry.issue_month))
            .await?;
        if entry.has_expiration {
            self.set_date(
                &["expir", "end"],
                present(&entry.expiration_year),
                present(&entry.expiration_month),
            )
            .await?;
        }
        if let Some(id) = present(&entry.credential_id) {
            self.fill_first(
                &["input[id*=\"credential-id\"]", "input[aria-label*=\"Credential ID\"]"],
                &truncate_chars(id, CREDENTIAL_ID_LIMIT),
            )
            .await?;
        }
        if let Some(url) = present(&entry.credential_url) {
            self.fill_first(
                &[
                    "input[id*=\"credential-url\"]",
                    "input[aria-label*=\"Credential URL\"]",
                    "input[type=\"url\"]",
                ],
                url,
            )
            .await?;
        }

        self.settle(1.0).await;
        self.save_form().await?;
        Ok(ActionResult::success(format!(
            "Certification added: {} from {}",
            entry.name, entry.issuing_organization
        )))
    }

    pub async fn add_project(&self, entry: &ProjectEntry) -> Result<ActionResult> {
        isolate(self.project_inner(entry).await, "adding project")
    }

    async fn project_inner(&self, entry: &ProjectEntry) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/edit/forms/project/new/", BASE)).await?;
        self.settle(2.0).await;

        self.fill_first(
            &[
                "input[id*=\"name\"]",
                "input[aria-label*=\"Project name\"]",
                "input[aria-label*=\"Name\"]",
            ],
            &entry.name,
        )
        .await?;
        self.settle(0.3).await;
        self.apply_dates(&entry.dates).await?;
        if let Some(url) = present(&entry.project_url) {
            self.fill_first(
                &["input[type=\"url\"]", "input[id*=\"url\"]", "input[aria-label*=\"URL\"]"],
                url,
            )
            .await?;
        }
        if let Some(description) = present(&entry.description) {
            self.type_into_last(
                &["textarea", "[role=\"textbox\"]"],
                &truncate_chars(description, PROJECT_DESCRIPTION_LIMIT),
            )
            .await?;
        }

        self.settle(1.0).await;
        self.save_form().await?;
        Ok(ActionResult::success(format!("Project added: {}", entry.name)))
    }

    pub async fn add_language(&self, language: &str, proficiency: &str) -> Result<ActionResult> {
        isolate(self.language_inner(language, proficiency).await, "adding language")
    }

    async fn language_inner(&self, language: &str, proficiency: &str) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/edit/forms/language/new/", BASE)).await?;
        self.settle(2.0).await;

        self.autocomplete(&["input[id*=\"language\"]", "input[aria-label*=\"Language\"]"], language)
            .await?;
        self.settle(0.3).await;
        let picked = self.call(SELECT_PROFICIENCY, json!(proficiency)).await?;
        debug!("Proficiency {} selected: {}", proficiency, picked);

        self.settle(1.0).await;
        self.save_form().await?;
        Ok(ActionResult::success(format!(
            "Language added: {} ({})",
            language, proficiency
        )))
    }

    async fn pick_profile_language(&self, language: &str) -> Result<bool> {
        let picked = self
            .call(PICK_PROFILE_LANGUAGE, json!(language_label(language)))
            .await?;
        Ok(picked.as_bool().unwrap_or(false))
    }

    /// Edit forms show one tab per profile language
    async fn switch_form_language(&self, language: &str) -> Result<()> {
        if language != "pt" {
            return Ok(());
        }
        let tab = ButtonMatch::default();
        if dom::click_button(self.page(), &["portuguese", "português"], tab)
            .await?
            .is_some()
        {
            self.settle(1.0).await;
        }
        Ok(())
    }

    /// Type into the first matching field. `Ok(false)` when none exists.
    async fn fill_first(&self, selectors: &[&str], value: &str) -> Result<bool> {
        match self.first_existing(selectors).await? {
            Some(selector) => {
                self.page().fill(selector, value).await?;
                Ok(true)
            }
            None => {
                debug!("No field for {:?}", selectors);
                Ok(false)
            }
        }
    }

    /// Type into a typeahead and take the first suggestion
    async fn autocomplete(&self, selectors: &[&str], value: &str) -> Result<bool> {
        if value.is_empty() || !self.fill_first(selectors, value).await? {
            return Ok(false);
        }
        self.settle(0.5).await;
        self.page().press_key("ArrowDown").await?;
        self.page().press_key("Enter").await?;
        Ok(true)
    }

    async fn set_date(&self, keys: &[&str], year: Option<&str>, month: Option<&str>) -> Result<()> {
        if year.is_none() && month.is_none() {
            return Ok(());
        }
        self.call(SET_DATE, json!({ "keys": keys, "year": year, "month": month }))
            .await?;
        self.settle(0.3).await;
        Ok(())
    }

    async fn apply_dates(&self, dates: &DateRange) -> Result<()> {
        if dates.is_current {
            self.call(TICK_CHECKBOX, json!(["current"])).await?;
            self.settle(0.3).await;
        }
        self.set_date(&["start"], present(&dates.start_year), present(&dates.start_month))
            .await?;
        if !dates.is_current {
            self.set_date(&["end"], present(&dates.end_year), present(&dates.end_month))
                .await?;
        }
        Ok(())
    }

    async fn type_into_last(&self, selectors: &[&str], text: &str) -> Result<()> {
        if self.call(FOCUS_LAST, json!(selectors)).await?.as_bool().unwrap_or(false) {
            self.page().type_text(text).await?;
        }
        Ok(())
    }

    async fn save_form(&self) -> Result<()> {
        let save = ButtonMatch {
            scope: None,
            exact: true,
            aria: false,
        };
        match dom::click_button(self.page(), &["save"], save).await? {
            Some(_) => {
                info!("Profile form saved");
                self.settle(2.0).await;
            }
            None => debug!("No Save button on the form"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_update_empty() {
        assert!(IntroUpdate::default().is_empty());
        let blank = IntroUpdate {
            headline: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.is_empty());
        let update: IntroUpdate = serde_json::from_value(json!({"city": "Lisbon"})).unwrap();
        assert!(!update.is_empty());
    }

    #[test]
    fn test_experience_entry_flattens_dates() {
        let entry: ExperienceEntry = serde_json::from_value(json!({
            "title": "Engineer",
            "company": "Acme",
            "start_month": "March",
            "start_year": "2021",
            "is_current": true
        }))
        .unwrap();
        assert_eq!(entry.dates.start_year.as_deref(), Some("2021"));
        assert!(entry.dates.is_current);
        assert!(entry.dates.end_year.is_none());
    }

    #[test]
    fn test_certification_expires_by_default() {
        let entry: CertificationEntry =
            serde_json::from_value(json!({"name": "CKA", "issuing_organization": "CNCF"})).unwrap();
        assert!(entry.has_expiration);
    }

    #[test]
    fn test_about_preview() {
        assert_eq!(about_preview("short"), "short");
        let long = "x".repeat(250);
        let preview = about_preview(&long);
        assert_eq!(preview.len(), 203);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_language_label() {
        assert_eq!(language_label("pt"), "Português");
        assert_eq!(language_label("en"), "English");
        assert_eq!(language_label("fr"), "English");
    }
}
