//! Natural-language to SQL translation over a fixed schema contract.

use argorag_llm::Generator;
use serde::Serialize;

/// Instruction constraining the generated query to read-only retrieval.
const SYSTEM_PROMPT: &str = "\
You are an SQL generator for the ARGO float profile database.
Only generate SELECT queries.
Never include DROP, DELETE, UPDATE, INSERT, or other data-mutating statements.
Limit results to 100 rows.
All semantic matching should be done on the 'summary' field.
Optional filters: latitude, longitude, date_time, and ocean.";

/// Machine-readable description of the queryable table.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescription {
    pub table: String,
    pub columns: Vec<String>,
    pub description: String,
}

impl Default for SchemaDescription {
    fn default() -> Self {
        Self {
            table: "profiles".to_string(),
            columns: [
                "profile_id",
                "date_time",
                "latitude",
                "longitude",
                "summary",
                "ocean",
                "institution",
            ]
            .map(String::from)
            .to_vec(),
            description: "Table containing metadata for ARGO float profiles. Only the \
                          'summary' field should be used for semantic matching. Optional \
                          filters: latitude, longitude, date_time, and ocean."
                .to_string(),
        }
    }
}

/// Converts a free-text question into a single SQL query string via the
/// generation service.
pub struct QueryTranslator<G: Generator> {
    generator: G,
    schema: SchemaDescription,
}

impl<G: Generator> QueryTranslator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            schema: SchemaDescription::default(),
        }
    }

    pub fn with_schema(generator: G, schema: SchemaDescription) -> Self {
        Self { generator, schema }
    }

    /// Translate a question into SQL, or `None` when the service fails or
    /// returns unusable text. Callers must treat `None` as a hard failure
    /// of this stage, not as an empty result.
    pub async fn translate(&self, question: &str) -> Option<String> {
        let prompt = self.build_prompt(question);

        match self.generator.generate(&prompt).await {
            Ok(raw) => {
                let sql = strip_code_fences(&raw);
                if sql.is_empty() {
                    tracing::warn!(question, "generation service returned no usable query");
                    None
                } else {
                    tracing::debug!(question, %sql, "translated question");
                    Some(sql)
                }
            }
            Err(error) => {
                tracing::warn!(question, %error, "query translation failed");
                None
            }
        }
    }

    fn build_prompt(&self, question: &str) -> String {
        // Field order in the struct keeps this byte-stable across calls.
        let schema_json =
            serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| String::new());

        format!(
            "{system}\n---\nDatabase Schema:\n{schema}\n---\nUser Query: \"{question}\"\n---\n\
             Generate ONLY the PostgreSQL query, without markdown, explanation, or extra text.",
            system = SYSTEM_PROMPT,
            schema = schema_json,
            question = question,
        )
    }
}

/// Strip known code-fence markers from a raw model response.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```sql", "")
        .replace("```postgresql", "")
        .replace("```", "")
        .trim()
        .to_string()
}
