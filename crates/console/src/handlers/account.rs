//! Account handlers: create user, log in.

use std::io::{BufRead, Write};

use tracing::info;

use marketplace_core::{Coordinates, UserId};

use super::{HandlerError, Handlers, Outcome, Refusal};
use crate::console::ConsoleError;
use crate::db::UserRepository;
use crate::models::{NewUser, User};

impl<R: BufRead, W: Write, E: Write> Handlers<'_, R, W, E> {
    /// Create a customer account from name, password and grid coordinates.
    ///
    /// # Errors
    ///
    /// `HandlerError::Console` for non-numeric or non-finite coordinates,
    /// `HandlerError::Repository` if the insert fails.
    pub async fn create_user(&mut self) -> Result<UserId, HandlerError> {
        let name = self.console.prompt("\tEnter name: ")?;
        let password = self.console.prompt("\tEnter password: ")?;
        let latitude = self.prompt_axis("\tEnter latitude: ", "latitude")?;
        let longitude = self.prompt_axis("\tEnter longitude: ", "longitude")?;

        let user = NewUser {
            name,
            password,
            coordinates: Coordinates::new(latitude, longitude),
        };
        let id = UserRepository::new(self.pool).create(&user).await?;

        info!(user_id = %id, "User created");
        writeln!(self.console.out(), "User successfully created! Your user ID is {id}.")?;
        Ok(id)
    }

    /// Look up a user by exact name and password.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if the lookup fails.
    pub async fn log_in(&mut self) -> Result<Outcome<User>, HandlerError> {
        let name = self.console.prompt("\tEnter name: ")?;
        let password = self.console.prompt("\tEnter password: ")?;

        match UserRepository::new(self.pool)
            .authenticate(&name, &password)
            .await?
        {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "User logged in");
                writeln!(self.console.out(), "Welcome, {}!", user.name)?;
                Ok(Outcome::Done(user))
            }
            None => self.refuse(Refusal::InvalidCredentials),
        }
    }

    /// Read one grid coordinate; `NaN` and infinities are refused.
    fn prompt_axis(&mut self, label: &str, field: &'static str) -> Result<f64, HandlerError> {
        let answer = self.console.prompt(label)?;
        match answer.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ConsoleError::InvalidInput {
                field,
                expected: "a finite number",
                value: answer,
            }
            .into()),
        }
    }
}
