use async_openai::{
    self,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, ReasoningArgs, ReasoningEffort, Role,
    },
};

use std::env;

use crate::core::analyzer::AnalyzedSegment;
use crate::core::summary::Summary;
use crate::core::transcript::format_timestamp;
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str =
    "You are a meticulous product-review analyst. You write grounded, quote-backed reports \
     from annotated video transcript segments and never invent claims that are not in them.";
pub const OPENAI_OPT_IN_ENV: &str = "REVU_ALLOW_OPENAI";

#[derive(Clone)]
pub struct ReportService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl ReportService {
    pub fn new() -> Self {
        Self {
            client: async_openai::Client::new(),
        }
    }

    /// Narrative review report for one product, built from its stored
    /// segments and their aggregate summary. Requires the explicit
    /// opt-in env var since segment text leaves the machine.
    pub async fn generate_report(
        &self,
        product: &str,
        segments: &[AnalyzedSegment],
        summary: &Summary,
    ) -> Result<String> {
        enforce_openai_opt_in()?;

        if segments.is_empty() {
            return Err(Error::not_found(format!(
                "no analyzed segments stored for product '{product}'"
            )));
        }

        let request = CreateResponseArgs::default()
            .max_output_tokens(32768_u32)
            .model("gpt-5.2")
            .reasoning(
                ReasoningArgs::default()
                    .effort(ReasoningEffort::High)
                    .build()?,
            )
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(SYSTEM_PROMPT)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(format!(
                            "Write a Markdown review report for the product \"{product}\".

The input below is a set of transcript segments from video reviews, each annotated with a
sentiment label and keywords, followed by an aggregate summary.

Structure the report as:

## Verdict
One paragraph: what reviewers think of {product} overall.

## What reviewers praise
Bullet list, each point backed by a quoted segment with its timestamp.

## What reviewers criticize
Same format.

## Representative quotes
Up to five literal quotes with timestamps, mixing positive and negative.

## Should you buy it?
Short recommendation grounded strictly in the segments above.

Only use material from the input. Keep quotes literal.

<SUMMARY>
{}
</SUMMARY>

<SEGMENTS>
{}
</SEGMENTS>
",
                            summary.summary_text,
                            format_segments(segments),
                        ))
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    match c {
                        OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                        _ => {
                            eprintln!("Unexpected content type: {c:?}");
                            continue;
                        }
                    }
                }
            }
        }

        Ok(content)
    }
}

fn format_segments(segments: &[AnalyzedSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            format!(
                "[{} - {}] ({}) {}",
                format_timestamp(segment.start_time),
                format_timestamp(segment.end_time),
                segment.sentiment,
                segment.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn enforce_openai_opt_in() -> Result<()> {
    match env::var(OPENAI_OPT_IN_ENV) {
        Ok(val)
            if matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ) =>
        {
            Ok(())
        }
        _ => Err(Error::config(format!(
            "Report generation requires explicit opt-in. Set {OPENAI_OPT_IN_ENV}=1 to enable uploads to OpenAI."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::format_segments;
    use crate::core::analyzer::AnalyzedSegment;
    use crate::core::sentiment::Sentiment;
    use chrono::Utc;

    #[test]
    fn formats_segments_with_timestamps_and_labels() {
        let segment = AnalyzedSegment {
            video_url: "url".to_string(),
            video_title: "title".to_string(),
            start_time: 61.0,
            end_time: 64.0,
            text: "battery life is great".to_string(),
            sentiment: Sentiment::Positive,
            keywords: vec!["battery".to_string()],
            good_aspect: vec!["battery".to_string()],
            bad_aspect: Vec::new(),
            product_name: "Widget".to_string(),
            analyzed_at: Utc::now(),
        };

        let line = format_segments(std::slice::from_ref(&segment));
        assert_eq!(line, "[01:01 - 01:04] (positive) battery life is great");
    }
}
