// Resume ↔ job description evaluation.
// Implements: text extraction, chunking, embedding similarity, rubric assessment,
// score blending, and the orchestrator that sequences them.
// All backend calls go through llm_client traits, no direct HTTP calls here.

pub mod blender;
pub mod chunker;
pub mod extractor;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod roles;
pub mod rubric;
pub mod similarity;

#[cfg(test)]
pub mod test_doubles;
