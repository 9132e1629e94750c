//! Word placement engine.
//!
//! Given the current state of a story and one word, computes where the word
//! lands and the resulting cursor. Pure logic: no I/O, no clock.

use collab_core::story::{Paragraph, StoryDraft};

/// Maximum number of words in one sentence.
pub const WORDS_PER_SENTENCE: usize = 15;

/// Maximum number of sentences in one paragraph.
pub const SENTENCES_PER_PARAGRAPH: usize = 10;

/// Number of paragraphs a story holds before it closes.
pub const PARAGRAPHS_PER_STORY: usize = 7;

const LAST_PARAGRAPH: usize = PARAGRAPHS_PER_STORY - 1;
const LAST_SENTENCE: usize = SENTENCES_PER_PARAGRAPH - 1;

/// Places `word` into `draft` and returns the updated draft.
///
/// The first word of a story becomes its title. Every later word is appended
/// to the sentence under the cursor; full sentences roll over to the next
/// sentence, and a full paragraph rolls over to a new paragraph. Sentences and
/// paragraphs are created lazily, one per rollover step.
///
/// The caller guarantees `word` is a single non-empty whitespace-free token.
/// A draft that fills the last sentence of the last paragraph comes back with
/// `open == false`.
#[must_use]
pub fn advance(mut draft: StoryDraft, word: &str) -> StoryDraft {
    if draft.cursor.writing_title {
        append_word(&mut draft.title, word);
        draft.cursor.writing_title = false;
        return draft;
    }

    let mut paragraph = draft.cursor.paragraph;
    let mut sentence = draft.cursor.sentence;

    loop {
        while draft.paragraphs.len() <= paragraph {
            draft.paragraphs.push(Paragraph::default());
        }
        let sentences = &mut draft.paragraphs[paragraph].sentences;
        while sentences.len() <= sentence {
            sentences.push(String::new());
        }

        let current = &mut sentences[sentence];
        if word_count(current) < WORDS_PER_SENTENCE {
            append_word(current, word);
            break;
        }

        if sentence < LAST_SENTENCE {
            sentence += 1;
        } else {
            sentence = 0;
            paragraph += 1;
        }
    }

    // The second-to-last sentence of the last paragraph hands the cursor to
    // the last sentence as soon as it fills.
    if paragraph == LAST_PARAGRAPH
        && sentence == LAST_SENTENCE - 1
        && word_count(&draft.paragraphs[paragraph].sentences[sentence]) >= WORDS_PER_SENTENCE
    {
        sentence += 1;
    }

    if paragraph == LAST_PARAGRAPH
        && sentence == LAST_SENTENCE
        && draft.paragraphs[paragraph]
            .sentences
            .get(sentence)
            .is_some_and(|s| word_count(s) >= WORDS_PER_SENTENCE)
    {
        draft.open = false;
    }

    draft.cursor.paragraph = paragraph;
    draft.cursor.sentence = sentence;
    draft
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn append_word(text: &mut String, word: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(word);
}
