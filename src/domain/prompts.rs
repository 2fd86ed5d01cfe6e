//! Prompt templates for the LLM tasks.
//!
//! Each template carries a `{text}` placeholder for the input, and the
//! segmentation/grammar templates a `{format_instructions}` placeholder
//! filled with the machine-readable directive matching their output
//! contract. The analysis and SEO templates embed their output format
//! inline instead.

/// Full-text analysis: summary, title, keywords, tags, spelling, personage
pub const ANALYZE_PROMPT: &str = r#"
<input>{text}</input>
###TASK
- You are an assistant that analyzes news article and provides the following information:
1. Summary: You must summary base on the news content, write in semantic way
2. Title: The title that sum up the news content. Not exceed 50 characters
3. Keywords
4. Tags
5. Spelling: Check wrong pronunciation word and promote an alter word
6. Personage: Person name in <input>
- Input is in <input> tag

###CONSTRAIN
- Return in json only with the following format:
{"summary": "text summary", "title": "the title", "keywords": ["kw1", "kw2"], "tags": ["tag1", "tag2"], "spelling": {"wrong": "alter"}, "personage": ["name1", "name2"]}
- Language: Multilingual

###OUTPUT
```json
"#;

/// SEO scoring of an article on four criteria, each in the 0-100 range
pub const SEO_PROMPT: &str = r#"
###TASK
- You are search engine optimize(SEO) score analyzer, help me to scoring my article base on SEO criteria:
1. Keyword Usage
2. Readability
3. Content Length
4. Content Quality
- Input is in <input> tag

###CONSTRAIN
- Return in json only with the following format:
{"keyword_use": 50, "readability": 50, "content_length": 50, "content_quality": 50}
- Score Range: 0-100

<input>{text}</input>

###OUTPUT
```json
"#;

/// Segmentation of an .srt-formatted subtitle text into summarized segments
pub const SEGMENTATION_PROMPT: &str = r#"
Act as a text analyzer to review, summarize, and segment the provided text, which is a subtitle from a reading article in .srt format.
- Where possible, merge shorter segments to create unified, complete ideas without losing meaning.
- Summary: Summarize each segment succinctly, capturing key points and ideas in a clear and concise manner.
Ensure the resulting segments retain the meaning and flow of the original text while improving readability.

Input Text:
{text}

{format_instructions}
"#;

/// Single-word grammar and spelling check
pub const GRAMMAR_CHECK_PROMPT: &str = r#"
Act as a grammar and spelling corrector. Read the input text and identify grammar and spelling errors.
Only indentify grammar and spelling errors for single words not multiple words.

Input text:
{text}

{format_instructions}
"#;

/// Output directive derived from the `SegmentSet` contract
pub const SEGMENTS_FORMAT_INSTRUCTIONS: &str = r#"The output should be a single JSON document conforming to the schema below, with no surrounding text.
{"segments": [{"start": "Start timestamp of the segment in HH:MM:SS format, matching the subtitle timestamp in input text", "end": "End timestamp of the segment in HH:MM:SS format, matching the subtitle timestamp in input text", "content": "Content of the segment; provide a summary if necessary, with a maximum of 150 words", "title": "Title of the segment", "keywords": "Keywords in the segment, separated by commas; maximum of 3 keywords", "tags": "Tags for the segment, separated by commas; maximum of 3 tags"}]}"#;

/// Output directive derived from the `GrammarErrorSet` contract
pub const GRAMMAR_FORMAT_INSTRUCTIONS: &str = r#"The output should be a single JSON document conforming to the schema below, with no surrounding text.
{"grammar_errors": [{"wrong_word": "The error word with grammar or spelling error", "alter_word": "The correct word"}]}"#;

/// Substitutes the input text into a template
pub fn render(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}

/// Substitutes the format directive first so a `{format_instructions}`
/// occurrence inside the input text is left alone
pub fn render_with_instructions(template: &str, text: &str, format_instructions: &str) -> String {
    template
        .replace("{format_instructions}", format_instructions)
        .replace("{text}", text)
}
