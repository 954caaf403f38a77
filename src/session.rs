//! Client-side session: simulated accounts plus saved recipes.
//!
//! A [`Session`] is an explicit value handed to whatever needs the current
//! user. Everything it persists goes through the injected [`Storage`]:
//!
//! - `users`: JSON array of accounts
//! - `favorites_<email>` / `bookmarks_<email>`: JSON arrays of recipes
//!
//! Accounts are checked against plaintext passwords held in that storage.
//! This is a stand-in for a real login flow and protects nothing.

use std::collections::HashMap;

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Field, FormErrors, SessionError};
use crate::model::Recipe;

const USERS_KEY: &str = "users";
const MIN_PASSWORD_CHARS: usize = 6;

/// Key-value persistence used by the session
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// Storage kept in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Loose `x@y.z` shape check: no whitespace, an `@`, and a dot after it
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let domain = domain.rsplit_once('@').map_or(domain, |(_, d)| d);
    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn validate_credentials(email: &str, password: &str, errors: &mut FormErrors) {
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !looks_like_email(email) {
        errors.insert(Field::Email, "Please enter a valid email");
    }

    if password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.insert(Field::Password, "Password must be at least 6 characters");
    }
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), SessionError> {
        let mut errors = FormErrors::default();
        validate_credentials(&self.email, &self.password, &mut errors);
        errors.into_result()
    }
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), SessionError> {
        let mut errors = FormErrors::default();
        validate_credentials(&self.email, &self.password, &mut errors);

        if self.name.is_empty() {
            errors.insert(Field::Name, "Name is required");
        }
        if self.confirm_password.is_empty() {
            errors.insert(Field::ConfirmPassword, "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, "Passwords do not match");
        }

        errors.into_result()
    }
}

/// The current user and their saved recipes
pub struct Session<S: Storage> {
    storage: S,
    user: Option<User>,
    favorites: Vec<Recipe>,
    bookmarks: Vec<Recipe>,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            user: None,
            favorites: Vec::new(),
            bookmarks: Vec::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn favorites(&self) -> &[Recipe] {
        &self.favorites
    }

    pub fn bookmarks(&self) -> &[Recipe] {
        &self.bookmarks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, SessionError> {
        match self.storage.get(key) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    /// Create an account and log into it
    pub fn sign_up(&mut self, form: SignUpForm) -> Result<&User, SessionError> {
        form.validate()?;

        let mut users: Vec<User> = self.load(USERS_KEY)?;
        if users.iter().any(|user| user.email == form.email) {
            return Err(SessionError::EmailTaken);
        }

        let user = User {
            email: form.email,
            password: form.password,
            name: form.name,
        };
        users.push(user.clone());
        save(&mut self.storage, USERS_KEY, &users)?;
        info!("Created account for {}", user.email);

        self.start(user)
    }

    /// Log into an existing account
    pub fn log_in(&mut self, form: LoginForm) -> Result<&User, SessionError> {
        form.validate()?;

        let users: Vec<User> = self.load(USERS_KEY)?;
        let user = users
            .into_iter()
            .find(|user| user.email == form.email)
            .ok_or(SessionError::AccountNotFound)?;

        if user.password != form.password {
            return Err(SessionError::IncorrectPassword);
        }

        self.start(user)
    }

    /// Switch to `user`; the session is untouched if their saved lists cannot be read
    fn start(&mut self, user: User) -> Result<&User, SessionError> {
        let favorites: Vec<Recipe> = self.load(&favorites_key(&user.email))?;
        let bookmarks: Vec<Recipe> = self.load(&bookmarks_key(&user.email))?;
        debug!(
            "Loaded {} favorites and {} bookmarks for {}",
            favorites.len(),
            bookmarks.len(),
            user.email
        );

        self.favorites = favorites;
        self.bookmarks = bookmarks;
        Ok(&*self.user.insert(user))
    }

    pub fn log_out(&mut self) {
        self.user = None;
        self.favorites.clear();
        self.bookmarks.clear();
    }

    fn current_email(&self) -> Result<String, SessionError> {
        self.user
            .as_ref()
            .map(|user| user.email.clone())
            .ok_or(SessionError::NotLoggedIn)
    }

    /// Add or remove a favorite; returns whether `recipe` is now a favorite
    pub fn toggle_favorite(&mut self, recipe: &Recipe) -> Result<bool, SessionError> {
        let email = self.current_email()?;
        let saved = toggle(&mut self.favorites, recipe);
        save(&mut self.storage, &favorites_key(&email), &self.favorites)?;
        Ok(saved)
    }

    /// Add or remove a bookmark; returns whether `recipe` is now bookmarked
    pub fn toggle_bookmark(&mut self, recipe: &Recipe) -> Result<bool, SessionError> {
        let email = self.current_email()?;
        let saved = toggle(&mut self.bookmarks, recipe);
        save(&mut self.storage, &bookmarks_key(&email), &self.bookmarks)?;
        Ok(saved)
    }

    pub fn is_favorite(&self, recipe_id: u64) -> bool {
        self.user.is_some() && self.favorites.iter().any(|r| r.id == recipe_id)
    }

    pub fn is_bookmarked(&self, recipe_id: u64) -> bool {
        self.user.is_some() && self.bookmarks.iter().any(|r| r.id == recipe_id)
    }
}

fn save<S: Storage, T: Serialize + ?Sized>(
    storage: &mut S,
    key: &str,
    value: &T,
) -> Result<(), SessionError> {
    storage.set(key, serde_json::to_string(value)?);
    Ok(())
}

fn favorites_key(email: &str) -> String {
    format!("favorites_{email}")
}

fn bookmarks_key(email: &str) -> String {
    format!("bookmarks_{email}")
}

/// Remove `recipe` by id if present, otherwise append it
fn toggle(list: &mut Vec<Recipe>, recipe: &Recipe) -> bool {
    if list.iter().any(|r| r.id == recipe.id) {
        list.retain(|r| r.id != recipe.id);
        false
    } else {
        list.push(recipe.clone());
        true
    }
}
