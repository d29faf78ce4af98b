use heatplate::args::*;
use heatplate::grid::*;
use heatplate::initial_conditions::*;
use heatplate::snapshot;

fn run(args: &GenPlateArgs) -> heatplate::Result<()> {
    let mut grid = Grid::allocate(args.rows, args.cols)?;
    generate_ic(&mut grid, args.ic_type(), args.border, args.chunk_size);
    snapshot::write_grid(args.output(), &grid)?;
    if args.write_image {
        heatplate::image::write_heat_map(&args.image_path(), &grid)?;
    }
    Ok(())
}

fn main() {
    let args = GenPlateArgs::cli_setup("gen_plate");
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    log::info!(
        "{:?}: {}x{} {:?}",
        args.output(),
        args.rows,
        args.cols,
        args.ic_type()
    );
}
