use super::{ParseError, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Overwrite,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub path: String,
    pub mode: RedirectMode,
}

/// One command invocation: the command name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    tokens: Vec<Token>,
}

impl Stage {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(!tokens.is_empty());
        Self { tokens }
    }

    pub fn command(&self) -> &str {
        self.tokens.first().map(Token::value).unwrap_or_default()
    }

    pub fn args(&self) -> Vec<String> {
        self.tokens
            .iter()
            .skip(1)
            .map(|token| token.value().to_string())
            .collect()
    }

    pub fn argv(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| token.value().to_string())
            .collect()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
    redirection: Option<Redirection>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn redirection(&self) -> Option<&Redirection> {
        self.redirection.as_ref()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Pipeline, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyPipeline);
    }

    let mut segments: Vec<Vec<Token>> = vec![Vec::new()];
    for token in tokens {
        if token.is_pipe() {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push(token);
        }
    }

    for (index, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            return Err(ParseError::EmptyStage { index });
        }
    }

    let last = segments.len() - 1;
    if let Some(stage) = segments[..last]
        .iter()
        .position(|segment| segment.iter().any(Token::is_redirect))
    {
        return Err(ParseError::RedirectNotFinal { stage });
    }

    let redirection = split_redirection(&mut segments[last])?;
    if segments[last].is_empty() {
        return Err(ParseError::EmptyStage { index: last });
    }

    Ok(Pipeline {
        stages: segments.into_iter().map(Stage::new).collect(),
        redirection,
    })
}

/// Pulls a trailing `> path` / `>> path` pair off the final stage.
fn split_redirection(tokens: &mut Vec<Token>) -> Result<Option<Redirection>, ParseError> {
    let Some(position) = tokens.iter().position(Token::is_redirect) else {
        return Ok(None);
    };

    let trailing = &tokens[position + 1..];
    match trailing {
        [] => return Err(ParseError::MissingRedirectTarget),
        [target] if target.is_operator() => return Err(ParseError::MissingRedirectTarget),
        [_] => {}
        _ => return Err(ParseError::MalformedRedirection),
    }

    let mut pair = tokens.split_off(position);
    let target = pair.pop().map(Token::into_value).unwrap_or_default();
    let mode = match pair.first().map(Token::value) {
        Some(">>") => RedirectMode::Append,
        _ => RedirectMode::Overwrite,
    };

    Ok(Some(Redirection { path: target, mode }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    fn parse_line(line: &str) -> Result<Pipeline, ParseError> {
        parse(tokenize(line).unwrap())
    }

    #[test]
    fn test_single_stage() {
        let pipeline = parse_line("ls -la /tmp").unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.stages()[0].command(), "ls");
        assert_eq!(pipeline.stages()[0].args(), vec!["-la", "/tmp"]);
        assert!(pipeline.redirection().is_none());
    }

    #[test]
    fn test_three_stages() {
        let pipeline = parse_line("ls | grep foo | wc -l").unwrap();
        let commands: Vec<&str> = pipeline.stages().iter().map(Stage::command).collect();
        assert_eq!(commands, vec!["ls", "grep", "wc"]);
        assert_eq!(pipeline.stages()[2].argv(), vec!["wc", "-l"]);
        assert!(pipeline.redirection().is_none());
    }

    #[test]
    fn test_overwrite_redirection() {
        let pipeline = parse_line("echo hi > out.txt").unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.stages()[0].argv(), vec!["echo", "hi"]);
        assert_eq!(
            pipeline.redirection(),
            Some(&Redirection {
                path: "out.txt".to_string(),
                mode: RedirectMode::Overwrite,
            })
        );
    }

    #[test]
    fn test_append_redirection() {
        let pipeline = parse_line("echo hi >> out.txt").unwrap();
        assert_eq!(pipeline.redirection().map(|r| r.mode), Some(RedirectMode::Append));
        assert_eq!(pipeline.redirection().map(|r| r.path.as_str()), Some("out.txt"));
    }

    #[test]
    fn test_redirection_after_pipeline() {
        let pipeline = parse_line("cat a | sort >> 'my file.txt'").unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.stages()[1].argv(), vec!["sort"]);
        assert_eq!(pipeline.redirection().map(|r| r.path.as_str()), Some("my file.txt"));
    }

    #[test]
    fn test_empty_stages() {
        assert_eq!(parse_line("| ls"), Err(ParseError::EmptyStage { index: 0 }));
        assert_eq!(parse_line("ls |"), Err(ParseError::EmptyStage { index: 1 }));
        assert_eq!(parse_line("ls | | wc"), Err(ParseError::EmptyStage { index: 1 }));
        assert_eq!(parse_line("> out.txt"), Err(ParseError::EmptyStage { index: 0 }));
    }

    #[test]
    fn test_empty_pipeline() {
        assert_eq!(parse(Vec::new()), Err(ParseError::EmptyPipeline));
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(parse_line("echo hi >"), Err(ParseError::MissingRedirectTarget));
        assert_eq!(parse_line("echo hi > >"), Err(ParseError::MissingRedirectTarget));
    }

    #[test]
    fn test_redirect_in_middle_stage() {
        assert_eq!(
            parse_line("echo hi > a.txt | wc"),
            Err(ParseError::RedirectNotFinal { stage: 0 })
        );
    }

    #[test]
    fn test_malformed_redirection() {
        assert_eq!(parse_line("echo > a.txt hi"), Err(ParseError::MalformedRedirection));
        assert_eq!(parse_line("echo > a.txt > b.txt"), Err(ParseError::MalformedRedirection));
    }

    #[test]
    fn test_quoted_operators_stay_arguments() {
        let pipeline = parse_line(r#"echo "|" '>' out"#).unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.stages()[0].args(), vec!["|", ">", "out"]);
        assert!(pipeline.redirection().is_none());
    }
}
