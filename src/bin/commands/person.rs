use clap::{Args, Subcommand};
use roster::{OutputFormat, PersonRecord, RosterConfig};
use tabled::Tabled;

use super::{exit_with, open_database, print_done, print_record, print_records};

/// Arguments for the Person command
#[derive(Args)]
pub struct PersonArgs {
    #[clap(subcommand)]
    pub command: PersonCommands,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a person, replacing any person with the same id
    Add(PersonFields),

    /// Update an existing person
    Update(PersonFields),

    /// Delete a person by id
    Delete {
        /// Person id
        id: i64,
    },

    /// Show one person
    Get {
        /// Person id
        id: i64,
    },

    /// List all persons
    List,
}

#[derive(Args)]
pub struct PersonFields {
    /// Person id
    pub id: i64,

    /// First name
    pub first_name: String,

    /// Second name
    pub second_name: String,

    /// E-mail address, unique across persons
    pub email: String,
}

impl PersonFields {
    fn to_record(&self) -> PersonRecord {
        PersonRecord::new(self.id, &self.first_name, &self.second_name, &self.email)
    }
}

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "id")]
    person_id: i64,
    first_name: String,
    second_name: String,
    email: String,
}

impl From<&PersonRecord> for PersonRow {
    fn from(p: &PersonRecord) -> Self {
        PersonRow {
            person_id: p.person_id,
            first_name: p.first_name.clone(),
            second_name: p.second_name.clone(),
            email: p.email.clone(),
        }
    }
}

pub fn run(config: &RosterConfig, args: PersonArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        PersonCommands::Add(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.add_person(&record) {
                exit_with(e);
            }
            print_done(output_format, &format!("Person {} saved", record.person_id), &record);
        }
        PersonCommands::Update(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.update_person(&record) {
                exit_with(e);
            }
            print_done(
                output_format,
                &format!("Person {} updated", record.person_id),
                &record,
            );
        }
        PersonCommands::Delete { id } => match db.delete_person(id) {
            Ok(deleted) => print_done(
                output_format,
                &format!("Deleted {} person(s) with id {}", deleted, id),
                &deleted,
            ),
            Err(e) => exit_with(e),
        },
        PersonCommands::Get { id } => match db.persons().get(id) {
            Ok(person) => {
                print_record(person, "Person", id, output_format, |r| PersonRow::from(r))
            }
            Err(e) => exit_with(e),
        },
        PersonCommands::List => match db.persons().list() {
            Ok(persons) => print_records(&persons, output_format, |r| PersonRow::from(r)),
            Err(e) => exit_with(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_rows() {
        let persons = vec![
            PersonRecord::new(1, "John", "Doe", "john.doe@example.com"),
            PersonRecord::new(2, "Jane", "Roe", "jane.roe@example.com"),
        ];

        let row = PersonRow::from(&persons[1]);
        assert_eq!(row.fields(), vec!["2", "Jane", "Roe", "jane.roe@example.com"]);
        assert_eq!(PersonRow::headers(), vec!["id", "first_name", "second_name", "email"]);

        print_records(&persons, OutputFormat::Psv, |r| PersonRow::from(r));
        print_record(persons.first().cloned(), "Person", 1, OutputFormat::Table, |r| {
            PersonRow::from(r)
        });
    }
}
