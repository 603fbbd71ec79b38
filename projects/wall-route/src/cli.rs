use crate::overlay::svg::OverlayStyle;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub style: StyleArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the overlay API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "WALL_ROUTE_HOST")]
        host: IpAddr,

        /// Port to bind to
        #[arg(long, default_value_t = 12206, env = "WALL_ROUTE_PORT")]
        port: u16,
    },
    /// Render the route overlay of one analysis to SVG
    Render(RenderArgs),
    /// Describe a hold and its position in the active route
    Select(SelectArgs),
}

/// Analysis inputs shared by the offline commands
#[derive(ClapArgs, Debug)]
pub struct InputArgs {
    /// Hold detector output (`holds` or `objects` list)
    #[arg(long)]
    pub holds: PathBuf,

    /// Path planner output (coach payload, optionally wrapped in `coach`)
    #[arg(long)]
    pub coach: PathBuf,

    /// Wall photo; its natural size enables normalized coordinates
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub image: Option<PathBuf>,

    /// Image width in pixels, when the photo is not at hand
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

#[derive(ClapArgs, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output SVG file; stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the resolved steps and nodes as JSON instead of SVG
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Id of the clicked hold
    #[arg(long)]
    pub hold_id: String,
}

#[derive(ClapArgs, Debug)]
pub struct StyleArgs {
    /// Route line and node outline colour
    #[arg(long, global = true, default_value = "#3ddc97", env = "WALL_ROUTE_PATH_COLOR")]
    pub path_color: String,

    /// Route line width in pixels
    #[arg(long, global = true, default_value_t = 4.0, env = "WALL_ROUTE_PATH_WIDTH")]
    pub path_width: f64,

    /// Radius of numbered route nodes in pixels
    #[arg(long, global = true, default_value_t = 14.0, env = "WALL_ROUTE_NODE_RADIUS")]
    pub node_radius: f64,

    /// Hold marker colour
    #[arg(long, global = true, default_value = "#58a6ff", env = "WALL_ROUTE_HOLD_COLOR")]
    pub hold_color: String,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&StyleArgs> for OverlayStyle {
    fn from(args: &StyleArgs) -> Self {
        Self {
            path_color: args.path_color.clone(),
            path_width: args.path_width,
            node_radius: args.node_radius,
            hold_color: args.hold_color.clone(),
            ..OverlayStyle::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let args = Args::try_parse_from([
            "wall-route",
            "render",
            "--holds",
            "h.json",
            "--coach",
            "c.json",
            "--width",
            "640",
            "--height",
            "480",
            "--path-width",
            "6",
        ])
        .unwrap();
        match args.command {
            Command::Render(render) => {
                assert_eq!(render.input.width, Some(640));
                assert!(render.out.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(OverlayStyle::from(&args.style).path_width, 6.0);
    }

    #[test]
    fn test_width_requires_height() {
        let res = Args::try_parse_from([
            "wall-route", "render", "--holds", "h.json", "--coach", "c.json", "--width", "640",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_select_requires_hold_id() {
        let res = Args::try_parse_from(["wall-route", "select", "--holds", "h.json", "--coach", "c.json"]);
        assert!(res.is_err());
    }
}
