//! Text menu loop over a line source.

use anyhow::{Context, Result};
use lazypkm_core::model::date::format_due_date;
use lazypkm_core::{
    Assignment, AssignmentStatus, JsonFileStore, KeywordEnricher, KnowledgeLink, Session, Task,
};
use log::info;
use std::io::{self, Write};

const PREVIEW_CHARS: usize = 100;
const SHORT_ID_CHARS: usize = 8;

/// Whether the loop should keep reading input.
enum Flow {
    Continue,
    Exit,
}

pub struct App<I> {
    session: Session,
    store: JsonFileStore,
    lines: I,
    enricher: KeywordEnricher,
}

impl<I> App<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(session: Session, store: JsonFileStore, lines: I) -> Self {
        Self {
            session,
            store,
            lines,
            enricher: KeywordEnricher::new(),
        }
    }

    /// Runs the main menu until save-and-exit, quit or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            print_main_menu();
            let Some(choice) = self.prompt("Select an option: ")? else {
                // End of input behaves like save-and-exit.
                return self.save_and_exit();
            };

            let outcome = match choice.as_str() {
                "1" => self.add_knowledge(),
                "2" => self.add_task(),
                "3" => self.list_tasks(true),
                "4" => self.list_tasks(false),
                "5" => self.complete_task(),
                "6" => self.search_knowledge(),
                "7" => self.delete_knowledge(),
                "8" => self.run_enrichment(),
                "9" => self.add_schedule(),
                "10" => self.list_schedule(),
                "11" => self.remove_schedule(),
                "12" => self.assignments_menu(),
                "13" => return self.save_and_exit(),
                "q" | "quit" => {
                    if self.session.is_dirty() {
                        println!("Unsaved changes discarded.");
                    }
                    return Ok(());
                }
                "" => Ok(Flow::Continue),
                _ => {
                    println!("Invalid choice. Please try again.");
                    Ok(Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return self.save_and_exit(),
                Err(err) => println!("\n[ERROR] {err}"),
            }
        }
    }

    /// Prints `label` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        match self.lines.next() {
            Some(line) => Ok(Some(line.context("cannot read input")?.trim().to_string())),
            None => Ok(None),
        }
    }

    /// Like [`Self::prompt`] but treats end of input as an empty answer.
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    fn save_and_exit(&mut self) -> Result<()> {
        self.session.save(&self.store).with_context(|| {
            format!("cannot save records to {}", self.store.data_dir().display())
        })?;
        println!(
            "\n--- Data saved successfully to {} ---",
            self.store.data_dir().display()
        );
        info!("event=cli_exit module=cli status=ok");
        Ok(())
    }

    // ---- knowledge ----

    fn add_knowledge(&mut self) -> Result<Flow> {
        let title = self.ask("Enter Title: ")?;
        let content = self.ask("Enter Content: ")?;
        let tags = parse_tags(&self.ask("Enter Tags (comma-separated, optional): ")?);
        let entry = self.session.add_knowledge(title, content, tags)?;
        println!(
            "Knowledge entry '{}' added with ID: {}",
            entry.title(),
            entry.id()
        );
        Ok(Flow::Continue)
    }

    fn search_knowledge(&mut self) -> Result<Flow> {
        let query = self.ask("Enter search keywords: ")?;
        if query.is_empty() {
            println!("Please enter keywords.");
            return Ok(Flow::Continue);
        }
        let results = self.session.search_knowledge(&query);
        println!("\n--- Found {} results for '{}' ---", results.len(), query);
        for (i, entry) in results.iter().enumerate() {
            println!("{}. Title: {}", i + 1, entry.title());
            println!("   Summary: {}", entry.display_summary(PREVIEW_CHARS));
            println!("   Tags: {}", entry.tags().join(", "));
            println!("   ID: {}", entry.id());
        }
        Ok(Flow::Continue)
    }

    fn print_knowledge_choices(&self) {
        for (i, entry) in self.session.knowledge().iter().enumerate() {
            println!(
                "  {}. {} (ID: {}...)",
                i + 1,
                entry.title(),
                short_id(&entry.id().to_string())
            );
        }
    }

    fn delete_knowledge(&mut self) -> Result<Flow> {
        if self.session.knowledge().is_empty() {
            println!("No knowledge entries.");
            return Ok(Flow::Continue);
        }
        self.print_knowledge_choices();
        let token = self.ask("Enter ID or number to delete: ")?;
        let removed = self.session.delete_knowledge(&token)?;
        println!("Deleted knowledge entry '{}'.", removed.title());
        Ok(Flow::Continue)
    }

    // ---- tasks ----

    fn add_task(&mut self) -> Result<Flow> {
        let title = self.ask("Enter Task Title: ")?;
        let description = self.ask("Enter Description: ")?;
        let due_date = self.ask("Enter Due Date (YYYY-MM-DD): ")?;

        let link = if self.session.knowledge().is_empty() {
            String::new()
        } else {
            println!("\nAvailable Knowledge Entries for Linking:");
            self.print_knowledge_choices();
            self.ask("Enter ID or number to link (or leave blank): ")?
        };

        let task = self
            .session
            .add_task(title, description, &due_date, Some(link.as_str()))?;
        if task.due_date().is_none() && !due_date.is_empty() {
            println!("Due date '{due_date}' is not YYYY-MM-DD; task saved as unscheduled.");
        }
        println!(
            "\nTask '{}' added with ID: {}. Priority: {}",
            task.title(),
            task.id(),
            task.priority()
        );
        Ok(Flow::Continue)
    }

    fn list_tasks(&mut self, pending: bool) -> Result<Flow> {
        let (label, tasks) = if pending {
            ("PENDING", self.session.pending_tasks())
        } else {
            ("COMPLETE", self.session.completed_tasks())
        };
        println!("\n--- {label} TASKS ---");
        if tasks.is_empty() {
            println!("No tasks found.");
            return Ok(Flow::Continue);
        }
        for (i, task) in tasks.iter().enumerate() {
            println!("{}", self.describe_task(i + 1, task));
        }
        Ok(Flow::Continue)
    }

    fn describe_task(&self, ordinal: usize, task: &Task) -> String {
        let link = match self.session.knowledge_link(task) {
            KnowledgeLink::Unlinked => String::new(),
            KnowledgeLink::Live(entry) => format!(" (Linked to {})", entry.title()),
            KnowledgeLink::Missing(id) => {
                format!(" (Missing link {}...)", short_id(&id.to_string()))
            }
        };
        let due = task
            .due_date()
            .map(format_due_date)
            .unwrap_or_else(|| "unscheduled".to_string());
        let priority = format!("[{}]", task.priority().as_str().to_uppercase());
        format!(
            "{ordinal}. {priority:<9} {} (Due: {due}){link}\n   Description: {}",
            task.title(),
            task.description()
        )
    }

    fn complete_task(&mut self) -> Result<Flow> {
        self.list_tasks(true)?;
        if self.session.pending_tasks().is_empty() {
            return Ok(Flow::Continue);
        }
        let token = self.ask("\nEnter number or ID of task to mark complete: ")?;
        let task = self.session.complete_task(&token)?;
        println!("Task '{}' marked as complete.", task.title());
        Ok(Flow::Continue)
    }

    // ---- enrichment ----

    fn run_enrichment(&mut self) -> Result<Flow> {
        println!("\n--- Agent cycle ---");
        let report = self.session.run_enrichment(&self.enricher);
        println!("Summarized {} knowledge entries.", report.summarized);
        println!("Prioritized {} pending tasks.", report.prioritized);
        for failure in &report.failures {
            println!("[SKIPPED] {} {}: {}", failure.kind, failure.id, failure.error);
        }
        if report.is_noop() {
            println!("Nothing to process.");
        }
        Ok(Flow::Continue)
    }

    // ---- schedules ----

    fn add_schedule(&mut self) -> Result<Flow> {
        let title = self.ask("Title: ")?;
        let day = self.ask("Day of week: ")?;
        let start = self.ask("Start time: ")?;
        let end = self.ask("End time: ")?;
        let location = self.ask("Location (optional): ")?;
        let location = (!location.is_empty()).then_some(location);
        let slot = self.session.add_schedule(title, day, start, end, location)?;
        println!("Added slot '{}' with ID: {}", slot.title(), slot.id());
        Ok(Flow::Continue)
    }

    fn list_schedule(&mut self) -> Result<Flow> {
        let slots = self.session.schedule_view();
        println!(
            "\n--- SCHEDULE ({} order) ---",
            self.session.schedule_order().as_str()
        );
        if slots.is_empty() {
            println!("No schedule slots.");
        }
        for (i, slot) in slots.iter().enumerate() {
            let location = slot
                .location()
                .map(|value| format!(" @ {value}"))
                .unwrap_or_default();
            println!(
                "{}. {} {}-{} {}{}",
                i + 1,
                slot.day_of_week(),
                slot.start_time(),
                slot.end_time(),
                slot.title(),
                location
            );
        }
        Ok(Flow::Continue)
    }

    fn remove_schedule(&mut self) -> Result<Flow> {
        self.list_schedule()?;
        let token = self.ask("Enter number or ID to remove: ")?;
        let removed = self.session.remove_schedule(&token)?;
        println!("Removed slot '{}'.", removed.title());
        Ok(Flow::Continue)
    }

    // ---- assignments ----

    fn assignments_menu(&mut self) -> Result<Flow> {
        loop {
            println!("\n--- Assignments ---");
            println!("a) Add  l) List  k) Link  c) Complete  d) Delete  s) Show links  b) Back");
            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(Flow::Exit);
            };
            let outcome = match choice.as_str() {
                "a" => self.add_assignment(),
                "l" => self.list_assignments(),
                "k" => self.link_assignments(),
                "c" => self.complete_assignment(),
                "d" => self.delete_assignment(),
                "s" => self.show_assignment_links(),
                "b" | "" => return Ok(Flow::Continue),
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                println!("\n[ERROR] {err}");
            }
        }
    }

    fn add_assignment(&mut self) -> Result<()> {
        let title = self.ask("Title: ")?;
        let course = self.ask("Course: ")?;
        let due_date = self.ask("Due Date (YYYY-MM-DD): ")?;
        let priority: i64 = self
            .ask("Priority (1-5): ")?
            .parse()
            .context("priority must be a whole number")?;
        let notes = self.ask("Notes (markdown, optional): ")?;
        let assignment = self
            .session
            .add_assignment(title, course, due_date, priority, notes)?;
        println!("Added assignment ID {}: {}", assignment.id(), assignment.title());
        Ok(())
    }

    fn list_assignments(&mut self) -> Result<()> {
        let listed = self.session.assignments().list_by_due_date();
        if listed.is_empty() {
            println!("No assignments.");
        }
        for (i, assignment) in listed.iter().enumerate() {
            println!("{}", describe_assignment(i + 1, assignment));
        }
        Ok(())
    }

    fn pick_assignment(&mut self, label: &str) -> Result<u64> {
        let token = self.ask(label)?;
        Ok(self.session.resolve_assignment(&token)?)
    }

    fn link_assignments(&mut self) -> Result<()> {
        self.list_assignments()?;
        let source = self.pick_assignment("Source (number or ID): ")?;
        let target = self.pick_assignment("Target (number or ID): ")?;
        if self.session.link_assignments(source, target)? {
            println!("Linked {source} -> {target}.");
        } else {
            println!("Link {source} -> {target} already exists.");
        }
        Ok(())
    }

    fn complete_assignment(&mut self) -> Result<()> {
        self.list_assignments()?;
        let id = self.pick_assignment("Assignment to complete (number or ID): ")?;
        self.session.complete_assignment(id)?;
        println!("Assignment {id} marked complete.");
        Ok(())
    }

    fn delete_assignment(&mut self) -> Result<()> {
        self.list_assignments()?;
        let id = self.pick_assignment("Assignment to delete (number or ID): ")?;
        let removed = self.session.delete_assignment(id)?;
        println!("Deleted assignment '{}'.", removed.title());
        Ok(())
    }

    fn show_assignment_links(&mut self) -> Result<()> {
        self.list_assignments()?;
        let id = self.pick_assignment("Assignment (number or ID): ")?;
        let linked = self.session.linked_assignment_titles(id)?;
        if linked.is_empty() {
            println!("No linked assignments.");
        }
        for link in linked {
            println!("  -> {}: {}", link.id, link.title);
        }
        Ok(())
    }
}

fn print_main_menu() {
    println!("\n--- Main Menu ---");
    println!(" 1. Add Knowledge Entry");
    println!(" 2. Add Task");
    println!(" 3. List Pending Tasks");
    println!(" 4. List Completed Tasks");
    println!(" 5. Complete Task");
    println!(" 6. Search Knowledge");
    println!(" 7. Delete Knowledge Entry");
    println!(" 8. Run Agent Cycle (Summarize/Prioritize)");
    println!(" 9. Add Schedule Slot");
    println!("10. List Schedule");
    println!("11. Remove Schedule Slot");
    println!("12. Assignments");
    println!("13. Save & Exit");
    println!(" q. Quit without saving");
}

fn describe_assignment(ordinal: usize, assignment: &Assignment) -> String {
    let status = match assignment.status() {
        AssignmentStatus::Pending => "pending",
        AssignmentStatus::Complete => "complete",
    };
    format!(
        "{ordinal}. [ID {}] {} ({}) due {} priority {} {status} links={}",
        assignment.id(),
        assignment.title(),
        assignment.course(),
        assignment.due_date(),
        assignment.priority(),
        assignment.linked_ids().len()
    )
}

/// Comma-separated tags as entered, each trimmed. Blank entries are kept.
fn parse_tags(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(|tag| tag.trim().to_string()).collect()
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_CHARS).unwrap_or(id)
}
