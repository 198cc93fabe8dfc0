//! Step-through explainer for the transformer page.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Track {
    #[default]
    Architecture,
    Training,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Architecture, Track::Training];

    pub fn label(self) -> &'static str {
        match self {
            Track::Architecture => "Architecture",
            Track::Training => "Training Process",
        }
    }

    pub fn steps(self) -> &'static [StepText] {
        match self {
            Track::Architecture => &ARCHITECTURE,
            Track::Training => &TRAINING,
        }
    }

    fn blocks(self) -> &'static [BlockDef] {
        match self {
            Track::Architecture => &ARCHITECTURE_BLOCKS,
            Track::Training => &TRAINING_BLOCKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepText {
    pub title: &'static str,
    pub explanation: &'static str,
    pub example: &'static str,
}

/// A diagram block as drawn at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub title: &'static str,
    /// Reached (`step >= block step`).
    pub active: bool,
    /// The step currently being explained.
    pub highlight: bool,
}

struct BlockDef {
    title: &'static str,
    row: usize,
    shown_from: usize,
    step: usize,
}

const fn block(title: &'static str, row: usize, shown_from: usize, step: usize) -> BlockDef {
    BlockDef {
        title,
        row,
        shown_from,
        step,
    }
}

const ARCHITECTURE: [StepText; 6] = [
    StepText {
        title: "Input Embeddings + Positional Encoding",
        explanation: "Converts words into vectors and adds position information.",
        example: "\"The cat sits on the mat\" → [[0.1, 0.5, 0.9], [0.8, 0.2, 0.3], [0.4, 0.9, 0.1], ..., [0.7, 0.1, 0.6]] + positional info.",
    },
    StepText {
        title: "Multi-Head Self-Attention",
        explanation: "Allows each word to look at other words in the sentence to understand context.",
        example: "For \"The cat sits\", self-attention computes weights based on \"cat\" and \"sits\" to capture subject-verb agreement.",
    },
    StepText {
        title: "Query, Key, Value Vectors",
        explanation: "Query (what I'm looking for), Key (what I match against), Value (what information I pass).",
        example: "For \"cat\": Query = \"What's happening?\", Key = \"Does this match the subject?\", Value = \"Sitting info\" → Attention focuses on \"sits\".",
    },
    StepText {
        title: "Feed Forward Network",
        explanation: "Transforms the attention output into a richer representation, capturing complex patterns.",
        example: "\"The cat sits\" becomes enriched with syntactic structure → e.g., subject-verb relationship encoded.",
    },
    StepText {
        title: "Layer Normalization",
        explanation: "Stabilizes values to prevent them from growing too large or small.",
        example: "\"The cat sits\": Normalize vector outputs → [0.25, 0.5, 1] scaled within a stable range.",
    },
    StepText {
        title: "Output Projection",
        explanation: "Final transformation to get the desired output format.",
        example: "Convert the enriched embeddings back to text: \"The cat sits on the mat.\"",
    },
];

const TRAINING: [StepText; 6] = [
    StepText {
        title: "Pre-training: Data Collection",
        explanation: "Gather massive amounts of text data from various sources like books, websites, and articles.",
        example: "\"The cat sits on the mat.\" is part of the pre-training corpus gathered from books, articles, and web data.",
    },
    StepText {
        title: "Pre-training: Self-Supervised Learning",
        explanation: "The model learns by predicting masked words.",
        example: "Masked input: \"The [MASK] sits on the mat.\" → The model uses context (\"The ... sits\") to predict the word \"cat\".",
    },
    StepText {
        title: "Pre-training: Initial Model",
        explanation: "Result is a model with general understanding of language but not specialized for any task.",
        example: "At this stage, the model might correctly complete the sentence: \"The cat sits on the mat.\" but doesn't understand specific nuances like sentiment.",
    },
    StepText {
        title: "Fine-tuning: Task-Specific Data",
        explanation: "Collect specific data for your task. For example, texts labeled positive/negative for sentiment analysis.",
        example: "For sentiment analysis: \"The cat sits happily on the mat.\" → Positive; \"The cat sits lazily on the mat.\" → Neutral.",
    },
    StepText {
        title: "Fine-tuning: Training",
        explanation: "Adjust the model weights based on the task-specific examples.",
        example: "The model adjusts to predict sentiment or masked words based on examples like \"The cat [MASK] on the mat\" → \"happily\".",
    },
    StepText {
        title: "Fine-tuning: Final Model",
        explanation: "The model is ready to use for your specific task, such as translation, summarization, or classification.",
        example: "Now, the model can output results for different tasks: \"The cat sits on the mat.\" → Sentiment: Neutral. \"Translate: 'The cat sits on the mat.'\" → \"Le chat est assis sur le tapis.\"",
    },
];

// Attention and its Q/K/V appear together at step 1; Q/K/V only light up at step 2.
const ARCHITECTURE_BLOCKS: [BlockDef; 8] = [
    block("Input Embeddings + Positional Encoding", 0, 0, 0),
    block("Multi-Head Self-Attention", 1, 1, 1),
    block("Q", 1, 1, 2),
    block("K", 1, 1, 2),
    block("V", 1, 1, 2),
    block("Feed Forward Network", 2, 3, 3),
    block("Layer Normalization", 3, 4, 4),
    block("Output Projection", 4, 5, 5),
];

const TRAINING_BLOCKS: [BlockDef; 6] = [
    block("Data Collection", 0, 0, 0),
    block("Self-Supervised Learning", 0, 0, 1),
    block("Initial Model", 0, 0, 2),
    block("Task-Specific Data", 0, 0, 3),
    block("Fine-tuning", 0, 0, 4),
    block("Final Model", 0, 0, 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "StoredWalkthrough"))]
pub struct Walkthrough {
    track: Track,
    step: usize,
}

/// Deserialized form; the step is clamped into its track on the way in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct StoredWalkthrough {
    track: Track,
    step: usize,
}

#[cfg(feature = "serde")]
impl From<StoredWalkthrough> for Walkthrough {
    fn from(stored: StoredWalkthrough) -> Self {
        let last = stored.track.steps().len().saturating_sub(1);
        Self {
            track: stored.track,
            step: stored.step.min(last),
        }
    }
}

impl Walkthrough {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.track.steps().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Switch tracks; always restarts at the first step.
    pub fn select(&mut self, track: Track) {
        self.track = track;
        self.step = 0;
    }

    pub fn current(&self) -> &'static StepText {
        &self.track.steps()[self.step]
    }

    pub fn can_prev(&self) -> bool {
        self.step > 0
    }

    pub fn can_next(&self) -> bool {
        self.step + 1 < self.len()
    }

    /// Returns whether the step moved.
    pub fn next(&mut self) -> bool {
        if self.can_next() {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.can_prev() {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    /// Visible diagram blocks, grouped into rows top to bottom.
    pub fn blocks(&self) -> Vec<Vec<Block>> {
        let mut rows: Vec<Vec<Block>> = Vec::new();
        for def in self.track.blocks() {
            if self.step < def.shown_from {
                continue;
            }
            if rows.len() <= def.row {
                rows.resize_with(def.row + 1, Vec::new);
            }
            rows[def.row].push(Block {
                title: def.title,
                active: self.step >= def.step,
                highlight: self.step == def.step,
            });
        }
        rows
    }
}
