//! Scoring rubric and prompt construction.

/// Bumped whenever the rubric text changes; recorded with every stored outcome.
pub const RUBRIC_VERSION: &str = "2025-1";

/// Fixed rubric sent ahead of every document.
pub const SCORING_RUBRIC: &str = r#"This is how you will decide the score for the privacy policy. Treat this as a rubric. Treat every policy exactly the same.
You will be scoring the privacy policy based on the following categories. Each category has a different weight, and you will be scoring each category out of 5 points. The total score will be out of 5 points.

# Privacy Policy Evaluation Framework

## A. Data Collection Practices (25%)

### 5 points:
- Data collection strictly limited to functional necessity
- Each data element has specific, documented justification
- Non-essential data collection requires explicit opt-in consent
- No unnecessary persistent identifiers collected
- Third-party data integration absent or minimal with transparent disclosure

### 4 points:
- Data collection primarily limited to justified purposes
- Most data elements have specific rationale
- Clear opt-in/opt-out mechanisms for non-essential collection
- Limited third-party data integration with clear disclosure
- Reasonable collection scope with justification

### 3 points:
- Moderate collection with general justifications
- Data categories defined but somewhat broad
- Some opt-in/opt-out options but not comprehensive
- Moderate third-party data integration
- Some collection without strong justification

### 2 points:
- Extensive collection with vague justifications
- Broad data categories without specific rationale
- Limited user choice regarding collection
- Significant third-party data contribution
- Collection of sensitive data with minimal justification

### 1 point:
- Excessive collection without meaningful justification
- No clear limitations on collection scope
- Absence of user choice regarding collection
- Extensive third-party data harvesting
- Collection of sensitive data without necessity

### 0 points:
- Deceptive collection practices
- Collection scope deliberately obscured
- Collection exceeds stated purposes

## B. Data Usage Within Company (25%)

### 5 points:
- Usage strictly limited to providing explicitly requested services
- No secondary internal uses beyond core functionality
- No algorithmic profiling or automated decision-making
- Clear purpose limitation enforcement
- No data mining for unrelated purposes

### 4 points:
- Usage primarily for service provision with specific justifications
- Limited personalization with transparent explanation
- Minimal internal secondary uses with clear reasoning
- Privacy-preserving processing techniques employed
- Specific purpose statements for each use case

### 3 points:
- Moderate usage for service improvement and personalization
- Some internal use for product development
- Limited algorithmic profiling with disclosure
- Marketing use with consent mechanisms
- Somewhat broad purpose statements

### 2 points:
- Extensive usage across company services
- Significant algorithmic profiling
- Multiple secondary uses with general justifications
- Regular use for marketing purposes
- Broad purpose statements with little specificity

### 1 point:
- Usage for purposes well beyond service provision
- Extensive profiling with minimal transparency
- Broad internal usage across unrelated products
- Heavy marketing and advertising focus
- Purpose statements overly broad or vague

### 0 points:
- Deceptive usage practices
- Hidden processing purposes
- No meaningful purpose limitation

## C. Data Sharing With Third Parties (25%)

### 5 points:
- No sharing except for essential service providers with strict contractual controls
- No data selling under any circumstances
- Law enforcement requests require valid warrants/court orders
- Complete list of all service providers with roles
- No downstream use beyond providing contracted service

### 4 points:
- Limited sharing with necessary service providers
- No direct data selling
- Data shared with law enforcement only with valid orders
- Vendor contracts include strong data protection requirements
- Categories of service providers disclosed

### 3 points:
- Moderate sharing with service providers and analytics partners
- May share de-identified data with commercial partners
- Sharing with law enforcement follows legal requirements
- Basic vendor oversight mechanisms
- General disclosure of sharing recipients

### 2 points:
- Extensive sharing network including marketing partners
- May sell aggregated or de-identified data
- May share with government entities without requiring warrants
- Limited vendor restrictions
- Vague disclosure of sharing relationships

### 1 point:
- Unrestricted sharing with commercial partners
- Sells identifiable personal data
- Readily shares with government without legal process
- No meaningful vendor controls
- Minimal transparency regarding sharing recipients

### 0 points:
- Deceptive sharing practices
- Sharing relationships deliberately obscured
- No limitations on recipient usage

## D. User Control of Data (15%)

### 5 points:
- Complete data deletion upon request except where legally required retention
- Full suite of data rights (access, rectification, portability)
- Easily accessible self-service privacy controls
- Granular permissions for different data categories
- Specific retention periods for each data category
- Automated data deletion at end of retention period

### 4 points:
- Strong deletion rights with minimal exceptions
- Comprehensive rights implementation
- Clear request process for data actions
- Specific retention periods for most data categories
- Regular data purging procedures

### 3 points:
- Standard deletion rights with some exceptions
- Basic rights implementation
- Defined process for exercising rights
- General retention periods
- Some data purging practices

### 2 points:
- Limited deletion rights with numerous exceptions
- Minimal rights recognition
- Complex process for exercising rights
- Vague retention timeframes
- Limited data purging evidence

### 1 point:
- Highly restricted deletion rights
- Few recognized user rights
- Burdensome rights exercise procedures
- Excessive or undefined retention periods
- No regular purging practices

### 0 points:
- No meaningful deletion rights
- Rights deliberately obstructed
- Indefinite data retention as default

## E. Policy Clarity (10%)

### 5 points:
- Clear, concise language at 8th-grade reading level or below
- Logical organization with intuitive navigation
- Visual elements to enhance understanding
- Examples illustrating data practices
- No legal jargon without plain language explanation
- Layered policy with summaries and details
- Version history with highlighted changes

### 4 points:
- Clear language with minimal jargon
- Well-structured document
- Some visual aids or examples
- Key terms clearly defined
- Easy navigation between sections

### 3 points:
- Generally understandable language
- Organized structure
- Limited jargon
- Basic definitions provided
- Reasonable length

### 2 points:
- Somewhat complex language
- Dense text with minimal organization
- Some unexplained legal terminology
- Few clarifying examples
- Excessive length

### 1 point:
- Complex legal language
- Poor organization
- Excessive jargon
- No examples or clarifications
- Unnecessarily verbose

### 0 points:
- Deliberately obfuscated language
- Contradictory statements
- Unnavigable structure

## Scoring Formula

Final Score = (A * 0.25) + (B * 0.25) + (C * 0.25) + (D * 0.15) + (E * 0.10)

## Privacy Policy Rating Scale

### Exceptional (4.5-5.0):
Industry-leading privacy practices with user interests prioritized

### Excellent (4.0-4.4):
Strong privacy practices exceeding regulatory requirements

### Good (3.5-3.9):
Solid privacy practices above industry average

### Adequate (3.0-3.4):
Satisfactory privacy practices meeting basic expectations

### Concerning (2.0-2.9):
Problematic privacy practices with significant issues

### Poor (1.0-1.9):
Inadequate privacy protections with serious concerns

### Unacceptable (0.0-0.9):
Fundamentally flawed privacy practices"#;

/// Output contract appended after the rubric.
pub const OUTPUT_INSTRUCTION: &str = r#"Provide ONLY a JSON object with the keys "score" (numerical value 1-5) and "summary" (1-2 paragraph text). Do not include any other text or markdown formatting."#;

/// Build the full scoring prompt for a document.
///
/// The document text is embedded verbatim.
pub fn build_prompt(document_text: &str) -> String {
    format!(
        "{}\n\n{}\n\nDocument Text:\n{}",
        SCORING_RUBRIC, OUTPUT_INSTRUCTION, document_text
    )
}

/// Rating band label for a final score.
pub fn rating_label(score: f64) -> &'static str {
    match score {
        s if s >= 4.5 => "Exceptional",
        s if s >= 4.0 => "Excellent",
        s if s >= 3.5 => "Good",
        s if s >= 3.0 => "Adequate",
        s if s >= 2.0 => "Concerning",
        s if s >= 1.0 => "Poor",
        _ => "Unacceptable",
    }
}
