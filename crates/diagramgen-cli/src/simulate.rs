//! Canned diagrams for offline testing. No upstream is ever contacted.

const SSH_BASTION_DIAGRAM: &str = "
sequenceDiagram
    participant User
    participant LocalMachine
    participant BastionHost
    participant TargetServer

    User->>LocalMachine: Generate SSH key pair
    Note over LocalMachine: Store private key locally
    LocalMachine->>BastionHost: Upload public key to authorized_keys
    LocalMachine->>TargetServer: Upload public key to authorized_keys

    User->>LocalMachine: ssh -i private_key user@bastion
    LocalMachine->>BastionHost: Authenticate with SSH key
    BastionHost->>LocalMachine: Authentication successful

    User->>BastionHost: ssh -i forwarded_key user@target
    BastionHost->>TargetServer: Authenticate with SSH key
    TargetServer->>BastionHost: Authentication successful
    BastionHost->>User: Secure connection established
";

const GENERIC_DIAGRAM: &str = "
graph TD
    A[Start] --> B{Is it a diagram?}
    B -->|Yes| C[Generate Diagram]
    B -->|No| D[Show Error]
    C --> E[Display Result]
    D --> E
";

/// Pick a canned diagram by naive keyword match on `text`.
pub fn simulate(text: &str) -> String {
    let lower = text.to_lowercase();
    let diagram = if lower.contains("ssh") && lower.contains("bastion") {
        SSH_BASTION_DIAGRAM
    } else {
        GENERIC_DIAGRAM
    };
    diagram.trim().to_string()
}
