use crate::calendar::Events;

/// Human-readable one-line-per-event table
pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn render(events: &Events) -> String {
        let mut output = String::from("Summary | Start -> End\n");

        for event in &events.items {
            let title = event.summary.as_deref().unwrap_or("(no title)");
            output.push_str(&format!(
                "{} | {} -> {}\n",
                title, event.start.value, event.end.value
            ));
        }

        output
    }
}
