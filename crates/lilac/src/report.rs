//! Parse-error report shown by the REPL.

use lilac_types::ParseErrors;

/// Banner printed above every parse-error report.
pub const MONKEY_EEK: &str = r"       __    EEEK!    
      /  \   ~~|~~   
     (|00|)    |      
      (==)  --/       
    ___||___          
   / _ .. _ \        
  //  |  |  \\      
 //   |  |   \\     
 ||  / /\ \  ||     
_|| _| || |_ ||_      
\|||___||___|||/\   
";

/// Render `errors` as the REPL's parse-error report.
pub fn parse_error_report(errors: &ParseErrors) -> String {
    let n = errors.len();
    let plural = if n > 1 { "s" } else { "" };
    let mut out = String::from(MONKEY_EEK);
    out.push_str("Oops, the monkey sees some errors in parser.\n");
    out.push_str(&format!("Parser has {n} Error{plural}.\n"));
    for error in errors {
        out.push_str(&format!("\t{}.\n", error.message));
    }
    out
}
