// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal (building a corpus, or inspecting text against a cutoff).
//
// Rules for this layer:
//   - No detection or packing logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - No file formats here (that's Layer 6)
//   - Only workflow coordination

// The corpus build workflow
pub mod package_use_case;

// The check / scan / estimate workflows
pub mod inspect_use_case;
