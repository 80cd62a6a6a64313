use clap::{Args, Subcommand};
use roster::output::display_opt;
use roster::{EmployeeCardRecord, OutputFormat, RosterConfig};
use tabled::Tabled;

use super::{exit_with, open_database, print_done, print_record, print_records};

/// Arguments for the Card command
#[derive(Args)]
pub struct CardArgs {
    #[clap(subcommand)]
    pub command: CardCommands,
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// Add an employee card, replacing any card with the same id
    Add(CardFields),

    /// Update an existing employee card
    Update(CardFields),

    /// Delete an employee card by id
    Delete {
        /// Card id
        id: i64,
    },

    /// Show one employee card
    Get {
        /// Card id
        id: i64,
    },

    /// List employee cards
    List {
        /// Only cards of this person
        #[clap(short, long)]
        person: Option<i64>,
    },
}

#[derive(Args)]
pub struct CardFields {
    /// Card id
    pub id: i64,

    /// Person holding the card
    #[clap(long)]
    pub person: Option<i64>,

    /// Project the person works on
    #[clap(long)]
    pub project: Option<i64>,

    /// Group the person belongs to
    #[clap(long)]
    pub group: Option<i64>,

    /// Start timestamp, `YYYY-MM-DD HH:MM:SS`; defaults to now on add
    #[clap(long)]
    pub start: Option<String>,

    /// End timestamp, `YYYY-MM-DD HH:MM:SS`
    #[clap(long)]
    pub end: Option<String>,
}

impl CardFields {
    fn to_record(&self) -> EmployeeCardRecord {
        EmployeeCardRecord::new(
            self.id,
            self.person,
            self.project,
            self.group,
            self.start.as_deref(),
            self.end.as_deref(),
        )
    }
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "id")]
    card_id: i64,
    person_id: String,
    project_id: String,
    group_id: String,
    start_date: String,
    end_date: String,
}

impl From<&EmployeeCardRecord> for CardRow {
    fn from(c: &EmployeeCardRecord) -> Self {
        CardRow {
            card_id: c.card_id,
            person_id: display_opt(&c.person_id),
            project_id: display_opt(&c.project_id),
            group_id: display_opt(&c.group_id),
            start_date: display_opt(&c.start_date),
            end_date: display_opt(&c.end_date),
        }
    }
}

pub fn run(config: &RosterConfig, args: CardArgs, output_format: OutputFormat) {
    let db = open_database(config);

    match args.command {
        CardCommands::Add(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.add_employee_card(&record) {
                exit_with(e);
            }
            // show the stored row, which carries the defaulted start date
            let stored = db
                .employee_cards()
                .get(record.card_id)
                .ok()
                .flatten()
                .unwrap_or(record);
            print_done(
                output_format,
                &format!("Employee card {} saved", stored.card_id),
                &stored,
            );
        }
        CardCommands::Update(fields) => {
            let record = fields.to_record();
            if let Err(e) = db.update_employee_card(&record) {
                exit_with(e);
            }
            print_done(
                output_format,
                &format!("Employee card {} updated", record.card_id),
                &record,
            );
        }
        CardCommands::Delete { id } => match db.delete_employee_card(id) {
            Ok(deleted) => print_done(
                output_format,
                &format!("Deleted {} employee card(s) with id {}", deleted, id),
                &deleted,
            ),
            Err(e) => exit_with(e),
        },
        CardCommands::Get { id } => match db.employee_cards().get(id) {
            Ok(card) => {
                print_record(card, "Employee card", id, output_format, |r| CardRow::from(r))
            }
            Err(e) => exit_with(e),
        },
        CardCommands::List { person } => {
            let cards = match person {
                Some(person_id) => db.employee_cards().list_for_person(person_id),
                None => db.employee_cards().list(),
            };
            match cards {
                Ok(cards) => print_records(&cards, output_format, |r| CardRow::from(r)),
                Err(e) => exit_with(e),
            }
        }
    }
}
