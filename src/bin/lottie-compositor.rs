use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lottie_compositor::{
    Animation, Colorspace, FrameCompositor, FrameOpts, FrameSampler, Rect, RenderTarget,
    rgba8_from_buffer,
};

const PNG_COLORSPACE: Colorspace = Colorspace::Abgr8888S;

#[derive(Parser, Debug)]
#[command(name = "lottie-compositor", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print frame count, duration, frame rate and size.
    Info(InfoArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame as numbered PNGs.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input Lottie JSON or SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print machine-readable JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output width in pixels (defaults to the native width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (defaults to the native height).
    #[arg(long)]
    height: Option<u32>,

    /// Crop rectangle `x,y,w,h` in target pixels.
    #[arg(long, value_parser = parse_crop)]
    crop: Option<Rect>,

    /// Rotation in degrees about the target centre.
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<f64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input Lottie JSON or SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, allow_hyphen_values = true)]
    frame: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Input Lottie JSON or SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Render every Nth frame.
    #[arg(long, default_value_t = 1)]
    step: u32,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn parse_crop(s: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid crop '{s}': {e}"))?;
    let [x, y, w, h] = parts[..] else {
        return Err(format!("crop must be x,y,w,h, got '{s}'"));
    };
    Ok(Rect::from_origin_size((x, y), (w, h)))
}

fn load(path: &Path) -> anyhow::Result<Animation> {
    Animation::from_path(path).with_context(|| format!("load animation '{}'", path.display()))
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let anim = load(&args.in_path)?;
    let size = anim.native_size();
    if args.json {
        let v = serde_json::json!({
            "name": anim.name(),
            "content_type": format!("{:?}", anim.content_type()).to_lowercase(),
            "frame_count": anim.frame_count(),
            "duration_secs": anim.duration_secs(),
            "frame_rate": anim.frame_rate(),
            "width": size.width,
            "height": size.height,
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
    } else {
        if let Some(name) = anim.name() {
            println!("name:        {name}");
        }
        println!("type:        {:?}", anim.content_type());
        println!("frames:      {}", anim.frame_count());
        println!("duration:    {:.3}s", anim.duration_secs());
        println!("frame rate:  {}", anim.frame_rate());
        println!("size:        {}x{}", size.width, size.height);
    }
    Ok(())
}

fn target_dims(anim: &Animation, args: &RenderArgs) -> anyhow::Result<(u32, u32)> {
    let native = anim.native_size();
    let w = args.width.unwrap_or(native.width.ceil() as u32);
    let h = args.height.unwrap_or(native.height.ceil() as u32);
    anyhow::ensure!(w > 0 && h > 0, "output size must be non-zero, got {w}x{h}");
    Ok((w, h))
}

fn frame_opts(args: &RenderArgs) -> FrameOpts {
    FrameOpts {
        crop: args.crop,
        rotation_deg: args.rotate,
    }
}

fn write_png(path: &Path, buf: &[u32], w: u32, h: u32) -> anyhow::Result<()> {
    let rgba = rgba8_from_buffer(buf, w, w, h, PNG_COLORSPACE)?;
    image::save_buffer_with_format(
        path,
        &rgba,
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let anim = load(&args.in_path)?;
    let (w, h) = target_dims(&anim, &args.render)?;
    let mut buf = vec![0u32; (w as usize) * (h as usize)];

    {
        let target = RenderTarget::new(&mut buf, w, w, h, PNG_COLORSPACE)?;
        let mut comp = FrameCompositor::new(anim, target);
        comp.render_frame(args.frame, &frame_opts(&args.render))
            .with_context(|| format!("render frame {}", args.frame))?;
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, &buf, w, h)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let anim = load(&args.in_path)?;
    let (w, h) = target_dims(&anim, &args.render)?;
    let opts = frame_opts(&args.render);
    let frames = FrameSampler::new(&anim).with_step(args.step);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut buf = vec![0u32; (w as usize) * (h as usize)];
    let target = RenderTarget::new(&mut buf, w, w, h, PNG_COLORSPACE)?;
    let mut comp = FrameCompositor::new(anim, target);

    let mut written = 0usize;
    for index in frames {
        comp.render_frame(index, &opts)
            .with_context(|| format!("render frame {index}"))?;
        let pixels = comp
            .buffer()
            .context("compositor has no buffer after a successful render")?;
        let out = args.out_dir.join(format!("frame_{index:05}.png"));
        write_png(&out, pixels, w, h)?;
        written += 1;
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}
