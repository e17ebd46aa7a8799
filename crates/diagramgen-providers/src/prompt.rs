//! Instruction template wrapped around the user's request.

const GUIDELINES: &str = "Follow these guidelines:
1. Respond ONLY with the Mermaid code block, no explanations or markdown formatting
2. Ensure the syntax is valid for Mermaid.js
3. Use appropriate diagram type (flowchart, sequence, class, etc.) based on the request
4. Keep the diagram clean and readable
5. Use meaningful labels and descriptions
6. Do not include ```mermaid or ``` tags

Example of good response format:
graph TD
    A[Client] -->|TCP/IP| B(Load Balancer)
    B -->|HTTP| C[Web Server]
    C -->|Query| D[Database]";

/// Build the full instruction sent upstream for a diagram request.
pub fn diagram_prompt(request: &str) -> String {
    format!("Generate valid Mermaid.js code for: {request}.\n\n{GUIDELINES}")
}
